//! Per-respondent and consolidated reports, as JSON models and `.xlsx`
//! documents.

use crate::error::{AppError, AppResult};
use crate::storage::{Database, ResponseFilter};
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use shared_types::{
    AnswerDetail, AnswerSummary, AnswerValue, ConsolidatedReport, LanguageCount, PerformanceBand,
    UserReport, UserSummaryRow,
};
use std::collections::BTreeMap;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rounded percentage of `part` in `whole`, 0 when `whole` is 0
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

pub fn performance_score(summary: &AnswerSummary) -> u32 {
    percentage(summary.yes, summary.total)
}

/// Share of the language's questions that were answered
pub fn completion_rate(answered: usize, expected: i64) -> u32 {
    percentage(answered, expected.max(0) as usize)
}

pub fn summarize_answers(answers: &[AnswerDetail]) -> AnswerSummary {
    answers
        .iter()
        .fold(AnswerSummary::default(), |mut summary, answer| {
            summary.total += 1;
            match answer.answer {
                AnswerValue::Yes => summary.yes += 1,
                AnswerValue::No => summary.no += 1,
                AnswerValue::NotApplicable => summary.na += 1,
            }
            if !answer.remarks.trim().is_empty() {
                summary.with_remarks += 1;
            }
            summary
        })
}

pub fn build_user_report(db: &Database, response_id: i64) -> AppResult<UserReport> {
    let response = db
        .get_response(response_id)?
        .ok_or_else(|| AppError::NotFound(format!("Response {} not found", response_id)))?;
    let answers = db.response_answers(response_id)?;
    let expected_questions = db.count_questions_for_language(response.language)?;

    let summary = summarize_answers(&answers);
    let performance_score = performance_score(&summary);

    Ok(UserReport {
        completion_rate: completion_rate(summary.total, expected_questions),
        band: PerformanceBand::from_score(performance_score),
        performance_score,
        expected_questions,
        summary,
        response,
        answers,
    })
}

pub fn build_consolidated_report(
    db: &Database,
    filter: &ResponseFilter,
) -> AppResult<ConsolidatedReport> {
    let summaries = db.response_summaries(filter)?;
    let question_stats = db.question_stats(filter.language)?;

    let mut expected_by_language = BTreeMap::new();
    let mut counts_by_language: BTreeMap<&'static str, LanguageCount> = BTreeMap::new();
    let mut totals = AnswerSummary::default();
    let mut users = Vec::with_capacity(summaries.len());

    for (response, summary) in &summaries {
        let expected = match expected_by_language.get(&response.language.as_str()) {
            Some(expected) => *expected,
            None => {
                let expected = db.count_questions_for_language(response.language)?;
                expected_by_language.insert(response.language.as_str(), expected);
                expected
            }
        };

        counts_by_language
            .entry(response.language.as_str())
            .or_insert(LanguageCount {
                language: response.language,
                count: 0,
            })
            .count += 1;

        totals.total += summary.total;
        totals.yes += summary.yes;
        totals.no += summary.no;
        totals.na += summary.na;
        totals.with_remarks += summary.with_remarks;

        users.push(UserSummaryRow {
            response_id: response.id,
            email: response.email.clone(),
            language: response.language,
            timestamp: response.timestamp,
            summary: *summary,
            performance_score: performance_score(summary),
            completion_rate: completion_rate(summary.total, expected),
        });
    }

    let yes_percentage = percentage(totals.yes, totals.total);

    Ok(ConsolidatedReport {
        generated_at: chrono::Utc::now().timestamp(),
        total_responses: summaries.len(),
        responses_by_language: counts_by_language.into_values().collect(),
        total_yes: totals.yes as i64,
        total_no: totals.no as i64,
        total_na: totals.na as i64,
        total_answers: totals.total as i64,
        yes_percentage,
        no_percentage: percentage(totals.no, totals.total),
        na_percentage: percentage(totals.na, totals.total),
        band: (totals.total > 0).then(|| PerformanceBand::from_score(yes_percentage)),
        question_stats,
        users,
    })
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
}

/// Render a single respondent's report as an `.xlsx` document
pub fn user_report_xlsx(report: &UserReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(16);
    let bold_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    sheet.write_string_with_format(0, 0, "Success Criteria Checklist Report", &title_format)?;

    let details: [(&str, String); 5] = [
        ("Email", report.response.email.clone()),
        ("Language", report.response.language.display_name().to_string()),
        ("Submitted", format_timestamp(report.response.timestamp)),
        ("Response ID", report.response.id.to_string()),
        ("Performance", report.band.label().to_string()),
    ];
    let mut row = 2u32;
    for (label, value) in &details {
        sheet.write_string_with_format(row, 0, *label, &bold_format)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Metric", &header_format())?;
    sheet.write_string_with_format(row, 1, "Value", &header_format())?;
    row += 1;

    let metrics: [(&str, f64); 8] = [
        ("Total Answers", report.summary.total as f64),
        ("Yes", report.summary.yes as f64),
        ("No", report.summary.no as f64),
        ("N/A", report.summary.na as f64),
        ("With Remarks", report.summary.with_remarks as f64),
        ("Expected Questions", report.expected_questions as f64),
        ("Performance Score (%)", report.performance_score as f64),
        ("Completion Rate (%)", report.completion_rate as f64),
    ];
    for (label, value) in metrics {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, value)?;
        row += 1;
    }
    sheet.autofit();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Answers")?;
    for (col, title) in ["#", "Area", "Activity", "Criteria", "Answer", "Remarks"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *title, &header_format())?;
    }
    for (idx, answer) in report.answers.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, answer.sequence_order as f64)?;
        sheet.write_string(row, 1, &answer.area)?;
        sheet.write_string(row, 2, &answer.activity)?;
        sheet.write_string(row, 3, &answer.criteria)?;
        sheet.write_string(row, 4, answer.answer.as_str())?;
        sheet.write_string(row, 5, &answer.remarks)?;
    }
    sheet.autofit();

    workbook.save_to_buffer()
}

/// Render the consolidated report as an `.xlsx` document
pub fn consolidated_report_xlsx(report: &ConsolidatedReport) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(16);

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    sheet.write_string_with_format(0, 0, "Consolidated Checklist Report", &title_format)?;
    sheet.write_string(1, 0, format!("Generated: {}", format_timestamp(report.generated_at)))?;

    let mut row = 3u32;
    sheet.write_string_with_format(row, 0, "Metric", &header_format())?;
    sheet.write_string_with_format(row, 1, "Value", &header_format())?;
    row += 1;

    let mut metrics: Vec<(String, f64)> = vec![("Total Responses".to_string(), report.total_responses as f64)];
    for count in &report.responses_by_language {
        metrics.push((
            format!("Responses ({})", count.language.display_name()),
            count.count as f64,
        ));
    }
    metrics.extend([
        ("Total Answers".to_string(), report.total_answers as f64),
        ("Yes".to_string(), report.total_yes as f64),
        ("No".to_string(), report.total_no as f64),
        ("N/A".to_string(), report.total_na as f64),
        ("Yes (%)".to_string(), report.yes_percentage as f64),
        ("No (%)".to_string(), report.no_percentage as f64),
        ("N/A (%)".to_string(), report.na_percentage as f64),
    ]);
    for (label, value) in &metrics {
        sheet.write_string(row, 0, label)?;
        sheet.write_number(row, 1, *value)?;
        row += 1;
    }
    sheet.write_string(row, 0, "Overall Performance")?;
    sheet.write_string(row, 1, report.band.map_or("-", |band| band.label()))?;
    sheet.autofit();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Questions")?;
    let headers = ["Language", "Area", "Activity", "Criteria", "Responses", "Yes", "No", "N/A", "Yes (%)"];
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header_format())?;
    }
    for (idx, stat) in report.question_stats.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, stat.language.as_str())?;
        sheet.write_string(row, 1, &stat.area)?;
        sheet.write_string(row, 2, &stat.activity)?;
        sheet.write_string(row, 3, &stat.criteria)?;
        sheet.write_number(row, 4, stat.total_responses as f64)?;
        sheet.write_number(row, 5, stat.yes_count as f64)?;
        sheet.write_number(row, 6, stat.no_count as f64)?;
        sheet.write_number(row, 7, stat.na_count as f64)?;
        sheet.write_number(
            row,
            8,
            percentage(stat.yes_count.max(0) as usize, stat.total_responses.max(0) as usize) as f64,
        )?;
    }
    sheet.autofit();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Respondents")?;
    let headers = [
        "Email", "Language", "Submitted", "Score (%)", "Yes", "No", "N/A", "Remarks", "Completion (%)",
    ];
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header_format())?;
    }
    for (idx, user) in report.users.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &user.email)?;
        sheet.write_string(row, 1, user.language.as_str())?;
        sheet.write_string(row, 2, format_timestamp(user.timestamp))?;
        sheet.write_number(row, 3, user.performance_score as f64)?;
        sheet.write_number(row, 4, user.summary.yes as f64)?;
        sheet.write_number(row, 5, user.summary.no as f64)?;
        sheet.write_number(row, 6, user.summary.na as f64)?;
        sheet.write_number(row, 7, user.summary.with_remarks as f64)?;
        sheet.write_number(row, 8, user.completion_rate as f64)?;
    }
    sheet.autofit();

    workbook.save_to_buffer()
}
