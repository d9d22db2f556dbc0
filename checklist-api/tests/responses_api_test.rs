mod common;

use actix_web::test::{self, TestRequest};
use common::setup_test_app;
use serde_json::{json, Value};
use shared_types::{
    AnswerInput, AnswerValue, Language, QuestionsResponse, ResponseListResponse,
    ResponseWithAnswers, SubmitResponseRequest, SubmitResponseResponse, UserReport,
};

fn answers_for(questions: &QuestionsResponse, values: &[AnswerValue]) -> Vec<AnswerInput> {
    questions
        .questions
        .iter()
        .zip(values)
        .map(|(q, value)| AnswerInput {
            question_id: q.id,
            answer: *value,
            remarks: None,
        })
        .collect()
}

#[actix_rt::test]
async fn test_questions_grouped_by_area() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let req = TestRequest::get().uri("/api/questions?lang=ID").to_request();
    let body: QuestionsResponse = test::call_and_read_body_json(&test_app.app, req).await;

    assert_eq!(body.language, Language::Id);
    assert_eq!(body.total_questions, 3);
    assert_eq!(body.grouped_questions.len(), 1);
    assert_eq!(body.grouped_questions[0].area, "Desain Part");
    assert_eq!(body.questions[0].activity, "Sketsa");

    let req = TestRequest::get().uri("/api/questions").to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 400);

    let req = TestRequest::get().uri("/api/questions?lang=FR").to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 400);

    let req = TestRequest::get().uri("/api/questions/999999").to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 404);
    Ok(())
}

#[actix_rt::test]
async fn test_submit_and_fetch_response() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let questions = test_app.database.questions_by_language(Language::En)?;
    let questions = QuestionsResponse {
        language: Language::En,
        total_questions: questions.len(),
        grouped_questions: Vec::new(),
        questions,
    };

    let mut answers = answers_for(
        &questions,
        &[AnswerValue::Yes, AnswerValue::No, AnswerValue::NotApplicable],
    );
    answers[1].remarks = Some("Pad fails on closed profiles".to_string());

    let req = TestRequest::post()
        .uri("/api/responses")
        .set_json(&SubmitResponseRequest {
            email: "engineer@example.com".to_string(),
            language: Language::En,
            answers,
        })
        .to_request();
    let submitted: SubmitResponseResponse =
        test::call_and_read_body_json(&test_app.app, req).await;

    let req = TestRequest::get()
        .uri(&format!("/api/responses/{}", submitted.response_id))
        .to_request();
    let fetched: ResponseWithAnswers = test::call_and_read_body_json(&test_app.app, req).await;

    assert_eq!(fetched.response.email, "engineer@example.com");
    assert_eq!(fetched.answers.len(), 3);
    assert_eq!(fetched.answers[0].activity, "Sketch");
    assert_eq!(fetched.answers[1].remarks, "Pad fails on closed profiles");
    assert_eq!(fetched.answers[2].answer, AnswerValue::NotApplicable);

    let req = TestRequest::get()
        .uri(&format!("/api/questions/{}/answers", questions.questions[1].id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(body["answers"][0]["email"], "engineer@example.com");
    assert_eq!(body["answers"][0]["answer"], "No");

    let req = TestRequest::get()
        .uri("/api/questions/stats?lang=EN")
        .to_request();
    let body: Value = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(body["stats"][0]["yes_count"], 1);
    assert_eq!(body["stats"][2]["na_count"], 1);
    Ok(())
}

#[actix_rt::test]
async fn test_failed_answer_leaves_no_response() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let questions = test_app.database.questions_by_language(Language::En)?;

    let mut answers: Vec<Value> = questions
        .iter()
        .map(|q| json!({"question_id": q.id, "answer": "Yes"}))
        .collect();
    answers.insert(2, json!({"question_id": 424242, "answer": "No"}));
    answers.push(json!({"question_id": questions[0].id, "answer": "N/A"}));
    assert_eq!(answers.len(), 5);

    let req = TestRequest::post()
        .uri("/api/responses")
        .set_json(json!({
            "email": "broken@example.com",
            "language": "EN",
            "answers": answers,
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "submission_failed");

    let req = TestRequest::get()
        .uri("/api/responses?email=broken")
        .to_request();
    let list: ResponseListResponse = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(list.count, 0);
    assert_eq!(test_app.database.total_responses()?, 0);
    Ok(())
}

#[actix_rt::test]
async fn test_submission_validation() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let question_id = test_app.database.questions_by_language(Language::En)?[0].id;

    let cases = vec![
        json!({"email": "  ", "language": "EN", "answers": []}),
        json!({"email": "a@example.com", "language": "FR", "answers": []}),
        json!({"email": "a@example.com", "language": "EN",
               "answers": [{"question_id": question_id, "answer": "Maybe"}]}),
        json!({"email": "a@example.com", "language": "EN",
               "answers": [{"question_id": question_id, "answer": "No", "remarks": "x".repeat(141)}]}),
    ];

    for case in cases {
        let req = TestRequest::post()
            .uri("/api/responses")
            .set_json(&case)
            .to_request();
        let resp = test::call_service(&test_app.app, req).await;
        assert_eq!(resp.status(), 400, "expected 400 for {case}");
    }

    assert_eq!(test_app.database.total_responses()?, 0);
    Ok(())
}

#[actix_rt::test]
async fn test_update_replaces_answers_and_delete() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let questions = test_app.database.questions_by_language(Language::En)?;
    let response_id = test_app.database.create_response_with_answers(
        "fixer@example.com",
        Language::En,
        &[AnswerInput {
            question_id: questions[0].id,
            answer: AnswerValue::No,
            remarks: None,
        }],
    )?;

    let req = TestRequest::put()
        .uri(&format!("/api/responses/{}", response_id))
        .set_json(json!({
            "answers": [
                {"question_id": questions[0].id, "answer": "Yes"},
                {"question_id": questions[1].id, "answer": "Yes", "remarks": "fixed"},
            ]
        }))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());

    let answers = test_app.database.response_answers(response_id)?;
    assert_eq!(answers.len(), 2);
    assert!(answers.iter().all(|a| a.answer == AnswerValue::Yes));

    let req = TestRequest::put()
        .uri("/api/responses/999999")
        .set_json(json!({"answers": []}))
        .to_request();
    assert_eq!(test::call_service(&test_app.app, req).await.status(), 404);

    let req = TestRequest::delete()
        .uri(&format!("/api/responses/{}", response_id))
        .to_request();
    assert!(test::call_service(&test_app.app, req).await.status().is_success());

    let req = TestRequest::delete()
        .uri(&format!("/api/responses/{}", response_id))
        .to_request();
    assert_eq!(test::call_service(&test_app.app, req).await.status(), 404);
    Ok(())
}

#[actix_rt::test]
async fn test_list_filters() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    test_app
        .database
        .create_response_with_answers("alice@example.com", Language::En, &[])?;
    test_app
        .database
        .create_response_with_answers("budi@contoh.id", Language::Id, &[])?;

    let req = TestRequest::get()
        .uri("/api/responses?language=ID")
        .to_request();
    let list: ResponseListResponse = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(list.count, 1);
    assert_eq!(list.responses[0].email, "budi@contoh.id");

    let req = TestRequest::get()
        .uri("/api/responses?end_date=2000-01-01")
        .to_request();
    let list: ResponseListResponse = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(list.count, 0);

    let req = TestRequest::get().uri("/api/responses?limit=1").to_request();
    let list: ResponseListResponse = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(list.count, 1);

    let req = TestRequest::get()
        .uri("/api/responses?start_date=not-a-date")
        .to_request();
    assert_eq!(test::call_service(&test_app.app, req).await.status(), 400);
    Ok(())
}

#[actix_rt::test]
async fn test_user_report_json_and_document() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let questions = test_app.database.questions_by_language(Language::Id)?;
    let answers: Vec<AnswerInput> = questions
        .iter()
        .map(|q| AnswerInput {
            question_id: q.id,
            answer: AnswerValue::Yes,
            remarks: None,
        })
        .collect();
    let response_id =
        test_app
            .database
            .create_response_with_answers("budi@contoh.id", Language::Id, &answers)?;

    let req = TestRequest::get()
        .uri(&format!("/api/responses/{}/report", response_id))
        .to_request();
    let report: UserReport = test::call_and_read_body_json(&test_app.app, req).await;
    assert_eq!(report.performance_score, 100);
    assert_eq!(report.completion_rate, 100);
    assert_eq!(report.band.label(), "Excellent");

    let req = TestRequest::get()
        .uri(&format!("/api/responses/{}/report.xlsx", response_id))
        .to_request();
    let resp = test::call_service(&test_app.app, req).await;
    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"PK"));

    let req = TestRequest::get()
        .uri("/api/responses/999999/report")
        .to_request();
    assert_eq!(test::call_service(&test_app.app, req).await.status(), 404);
    Ok(())
}
