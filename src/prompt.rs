//! Evaluation prompt construction
//!
//! Pure, deterministic string assembly: subject data interpolated into the
//! fixed ten-criterion instruction template. Missing optional data is replaced
//! by the fixed "정보 없음" placeholder, never an error.

use crate::types::{criterion_label, SubjectProfile, CRITERION_KEYS};

/// Placeholder used whenever a subject list is empty.
pub const NO_DATA: &str = "정보 없음";

/// Build the evaluation prompt for a subject.
pub fn build_prompt(subject: &SubjectProfile) -> String {
    let activities = join_or_placeholder(
        subject.recent_activities.iter().map(|a| format!("- {a}")),
    );
    let pledges = join_or_placeholder(subject.pledges.iter().map(|p| {
        format!("- {} ({}): {}", p.title, p.status, p.description)
    }));
    let news = join_or_placeholder(
        subject
            .news
            .iter()
            .map(|n| format!("- {} — {} ({})", n.title, n.summary, n.url)),
    );

    let criteria_list = CRITERION_KEYS
        .iter()
        .enumerate()
        .map(|(i, key)| format!("{}. {} — `{}`", i + 1, criterion_label(key), key))
        .collect::<Vec<_>>()
        .join("\n");

    let bio = if subject.bio.trim().is_empty() {
        NO_DATA
    } else {
        subject.bio.as_str()
    };

    format!(
        r#"당신은 정치인 평가 전문가입니다. 아래 자료를 바탕으로 다음 정치인을 평가해 주세요.
You are an expert evaluator of politicians. Evaluate the subject below using the provided materials.

## 평가 대상 (Subject)
- 이름 (Name): {name}
- 정당 (Party): {party}
- 직책 (Position): {position}
- 지역구 (Region): {region}

## 약력 (Biography)
{bio}

## 최근 활동 (Recent Activities)
{activities}

## 공약 이행 현황 (Pledges)
{pledges}

## 관련 뉴스 (News)
{news}

## 평가 기준 (Criteria)
다음 10개 기준 각각에 대해 0-100점 사이의 점수와 근거를 제시하세요.
Score each of the following 10 criteria from 0 to 100 with supporting evidence:

{criteria_list}

각 기준의 근거(evidence)는 최소 3000자 이상의 상세한 분석이어야 합니다.
Each criterion's evidence must be a detailed analysis of at least 3000 characters.

## 출력 형식 (Output Format)
반드시 아래 JSON 형식으로만 응답하세요. Respond with ONLY the following JSON shape:

{{
  "overall_score": 85,
  "overall_grade": "B+",
  "criteria": {{
    "integrity": {{ "score": 85, "evidence": "..." }},
    "expertise": {{ "score": 80, "evidence": "..." }},
    "communication": {{ "score": 82, "evidence": "..." }},
    "leadership": {{ "score": 78, "evidence": "..." }},
    "transparency": {{ "score": 84, "evidence": "..." }},
    "responsiveness": {{ "score": 81, "evidence": "..." }},
    "innovation": {{ "score": 76, "evidence": "..." }},
    "collaboration": {{ "score": 79, "evidence": "..." }},
    "constituency_service": {{ "score": 83, "evidence": "..." }},
    "policy_impact": {{ "score": 80, "evidence": "..." }}
  }},
  "summary": "종합 평가 요약",
  "strengths": ["강점 1", "강점 2", "강점 3"],
  "weaknesses": ["약점 1", "약점 2", "약점 3"],
  "sources": ["https://example.com/source1"]
}}

overall_score는 10개 기준 점수의 산술 평균이어야 하며, overall_grade는
A+/A/B+/B/C+/C/D 중 하나여야 합니다."#,
        name = subject.name,
        party = subject.party,
        position = subject.position,
        region = subject.region,
    )
}

fn join_or_placeholder<I: Iterator<Item = String>>(items: I) -> String {
    let joined: Vec<String> = items.collect();
    if joined.is_empty() {
        NO_DATA.to_string()
    } else {
        joined.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewsArticle, Pledge};

    fn subject() -> SubjectProfile {
        SubjectProfile {
            id: "pol-123".to_string(),
            name: "홍길동".to_string(),
            party: "무소속".to_string(),
            position: "국회의원".to_string(),
            region: "서울 종로구".to_string(),
            bio: "시민운동가 출신 3선 의원.".to_string(),
            recent_activities: vec!["본회의 출석".to_string()],
            pledges: vec![Pledge {
                title: "청년 주거 지원".to_string(),
                description: "임대주택 2만호 공급".to_string(),
                status: "진행중".to_string(),
            }],
            news: vec![NewsArticle {
                title: "예산안 통과".to_string(),
                summary: "주도적 역할".to_string(),
                url: "https://news.example.com/1".to_string(),
            }],
        }
    }

    #[test]
    fn prompt_embeds_identity_fields() {
        let p = build_prompt(&subject());
        assert!(p.contains("홍길동"));
        assert!(p.contains("무소속"));
        assert!(p.contains("국회의원"));
        assert!(p.contains("서울 종로구"));
    }

    #[test]
    fn prompt_names_all_ten_criteria() {
        let p = build_prompt(&subject());
        for key in CRITERION_KEYS {
            assert!(p.contains(key), "prompt missing criterion key {key}");
            assert!(p.contains(criterion_label(key)), "prompt missing label for {key}");
        }
    }

    #[test]
    fn empty_lists_fall_back_to_placeholder() {
        let mut s = subject();
        s.recent_activities.clear();
        s.pledges.clear();
        s.news.clear();
        s.bio = String::new();
        let p = build_prompt(&s);
        // one placeholder each for activities, pledges, news, and bio
        assert_eq!(p.matches(NO_DATA).count(), 4);
    }

    #[test]
    fn prompt_is_deterministic() {
        let s = subject();
        assert_eq!(build_prompt(&s), build_prompt(&s));
    }

    #[test]
    fn prompt_includes_output_example_and_length_floor() {
        let p = build_prompt(&subject());
        assert!(p.contains("\"overall_score\""));
        assert!(p.contains("3000"));
    }
}
