//! HTML report template
//!
//! Fixed multi-page layout: cover, overview, two criteria-detail pages
//! (10 criteria split 5+5), and a trend page only when history exists.
//! Pure string assembly; the browser side lives in the parent module.

use crate::types::{
    criterion_label, CriterionScore, HistoryEntry, PersistedEvaluation, SubjectProfile,
};

/// Most recent history entries shown on the trend page.
pub const MAX_TREND_ENTRIES: usize = 10;

/// Badge color for a grade, keyed on its first letter.
pub fn grade_color(grade: &str) -> &'static str {
    match grade.chars().next() {
        Some('S') => "#7c3aed", // purple
        Some('A') => "#2563eb", // blue
        Some('B') => "#16a34a", // green
        Some('C') => "#d97706", // amber
        Some('D') => "#dc2626", // red
        _ => "#6b7280",         // gray
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the full report document.
pub fn render_report_html(
    subject: &SubjectProfile,
    evaluation: &PersistedEvaluation,
    history: &[HistoryEntry],
) -> String {
    let mut pages = String::new();
    pages.push_str(&cover_page(subject, evaluation));
    pages.push_str(&overview_page(evaluation));

    let entries = evaluation.result.criteria.entries();
    pages.push_str(&criteria_page("평가 기준 상세 (1/2)", &entries[..5]));
    pages.push_str(&criteria_page("평가 기준 상세 (2/2)", &entries[5..]));

    if !history.is_empty() {
        pages.push_str(&trend_page(history));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>{name} 평가 보고서</title>
<style>
  body {{ font-family: 'Apple SD Gothic Neo', 'Malgun Gothic', sans-serif; color: #1f2937; margin: 0; }}
  .page {{ page-break-after: always; padding: 40px; }}
  .page:last-child {{ page-break-after: auto; }}
  h1 {{ font-size: 28px; }}
  h2 {{ font-size: 20px; border-bottom: 2px solid #e5e7eb; padding-bottom: 8px; }}
  .badge {{ display: inline-block; color: #fff; font-size: 36px; font-weight: bold;
           padding: 18px 34px; border-radius: 12px; }}
  .meta {{ color: #6b7280; font-size: 13px; }}
  table {{ width: 100%; border-collapse: collapse; }}
  th, td {{ border: 1px solid #e5e7eb; padding: 8px 10px; text-align: left; font-size: 13px; }}
  th {{ background: #f9fafb; }}
  .criterion {{ margin-bottom: 18px; }}
  .criterion .score {{ font-weight: bold; }}
  .evidence {{ font-size: 12px; color: #374151; white-space: pre-wrap; }}
  ul {{ margin: 6px 0; }}
</style>
</head>
<body>
{pages}
</body>
</html>"#,
        name = escape(&subject.name),
    )
}

fn cover_page(subject: &SubjectProfile, evaluation: &PersistedEvaluation) -> String {
    let grade = &evaluation.result.overall_grade;
    format!(
        r#"<div class="page" style="text-align: center; padding-top: 140px;">
  <h1>정치인 AI 평가 보고서</h1>
  <p style="font-size: 22px;">{name}</p>
  <p class="meta">{party} · {position} · {region}</p>
  <div class="badge" style="background: {color};">{grade}</div>
  <p style="font-size: 18px;">종합 점수 {score:.1} / 100</p>
  <p class="meta">평가일 {date} · 모델 {model}</p>
</div>
"#,
        name = escape(&subject.name),
        party = escape(&subject.party),
        position = escape(&subject.position),
        region = escape(&subject.region),
        color = grade_color(grade),
        grade = escape(grade),
        score = evaluation.result.overall_score,
        date = evaluation.evaluation_date.format("%Y-%m-%d"),
        model = escape(&evaluation.model_version),
    )
}

fn overview_page(evaluation: &PersistedEvaluation) -> String {
    let strengths = list_items(&evaluation.result.strengths);
    let weaknesses = list_items(&evaluation.result.weaknesses);
    format!(
        r#"<div class="page">
  <h2>종합 평가</h2>
  <p>{summary}</p>
  <h2>강점</h2>
  <ul>{strengths}</ul>
  <h2>약점</h2>
  <ul>{weaknesses}</ul>
</div>
"#,
        summary = escape(&evaluation.result.summary),
    )
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect()
}

fn criteria_page(title: &str, entries: &[(&'static str, &CriterionScore)]) -> String {
    let body: String = entries
        .iter()
        .map(|(key, criterion)| {
            format!(
                r#"<div class="criterion">
  <h3>{label} <span class="score">{score:.0}점</span></h3>
  <p class="evidence">{evidence}</p>
</div>
"#,
                label = criterion_label(key),
                score = criterion.score,
                evidence = escape(&criterion.evidence),
            )
        })
        .collect();

    format!(
        r#"<div class="page">
  <h2>{title}</h2>
{body}</div>
"#
    )
}

fn trend_page(history: &[HistoryEntry]) -> String {
    let rows: String = history
        .iter()
        .take(MAX_TREND_ENTRIES)
        .map(|entry| {
            format!(
                "<tr><td>{}</td><td>{:.1}</td><td>{}</td></tr>",
                entry.evaluation_date.format("%Y-%m-%d"),
                entry.overall_score,
                escape(&entry.overall_grade),
            )
        })
        .collect();

    format!(
        r#"<div class="page">
  <h2>평가 추이</h2>
  <table>
    <tr><th>평가일</th><th>종합 점수</th><th>등급</th></tr>
    {rows}
  </table>
</div>
"#
    )
}
