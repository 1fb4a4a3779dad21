//! # 통계(Stats) 모델 정의
//!
//! 날짜 범위와 최종 통계 응답 문서를 정의합니다.
//!
//! ## 구조체 역할
//! - `DateRange`: 집계 대상 기간 (시작일~종료일, 양 끝 포함)
//! - `StatsDocument`: 모든 호출자에게 반환되는 최종 통계 문서

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{CurrentlyReadingEntry, ReadingGoal};

/// 집계 대상 날짜 범위 — 시작일과 종료일 모두 포함(inclusive)입니다.
///
/// 응답의 `date_range` 필드로 그대로 직렬화됩니다.
/// chrono의 NaiveDate는 serde로 "2025-01-01" 같은 ISO 형식 문자열이 되므로,
/// 별도의 포맷 코드 없이 API 계약과 일치합니다.
///
/// # derive 매크로 설명
/// - `Copy`: 날짜 두 개뿐인 작은 값이므로 참조 대신 복사로 전달합니다
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DateRange {
    /// 범위 시작일 (포함)
    pub start: NaiveDate,
    /// 범위 종료일 (포함)
    pub end: NaiveDate,
}

/// 해당 연도의 1월 1일과 12월 31일을 만듭니다.
///
/// from_ymd_opt()은 2월 30일 같은 잘못된 날짜에 None을 반환하는 API인데,
/// 1월 1일과 12월 31일은 어느 해에나 존재하므로 여기서는 실패할 수 없습니다.
fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar date");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid calendar date");
    (start, end)
}

impl DateRange {
    /// 주어진 날짜가 속한 해 전체(1월 1일 ~ 12월 31일)를 범위로 만듭니다.
    ///
    /// 쿼리 파라미터 없이 호출했을 때의 기본 범위입니다.
    pub fn current_year(today: NaiveDate) -> Self {
        // .year(): Datelike 트레이트의 메서드. 날짜에서 연도를 꺼냅니다.
        let (start, end) = year_bounds(today.year());
        Self { start, end }
    }

    /// 선택적 시작일/종료일을 완전한 범위로 해석합니다.
    ///
    /// 호출자가 날짜를 일부만 보낼 수 있으므로, 빠진 쪽을 여기서 채웁니다:
    /// - 둘 다 없음 → 올해 전체 (1월 1일 ~ 12월 31일)
    /// - 시작일만 있음 → 종료일은 그 시작일이 속한 해의 12월 31일
    /// - 종료일만 있음 → 시작일은 그 종료일이 속한 해의 1월 1일
    /// - 둘 다 있음 → 그대로 사용
    ///
    /// "올해"가 아니라 "주어진 날짜가 속한 해"를 기준으로 채우는 이유:
    /// start_date=2023-03-01만 보냈는데 종료일을 올해(2025) 기준으로 채우면
    /// 의도와 다른 범위가 되기 때문입니다.
    ///
    /// 시작일이 종료일보다 뒤인지는 여기서 검사하지 않습니다.
    /// 그 검사는 집계기(compute_stats)의 책임입니다.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Self {
        // match로 네 가지 경우를 모두 명시적으로 처리합니다.
        // (Option, Option) 튜플 매칭 — 두 값의 조합을 한 번에 분기할 수 있습니다.
        match (start, end) {
            (None, None) => Self::current_year(today),
            (Some(s), None) => {
                // .1: 튜플의 두 번째 요소 (12월 31일)
                let end = year_bounds(s.year()).1;
                Self { start: s, end }
            }
            (None, Some(e)) => {
                // .0: 튜플의 첫 번째 요소 (1월 1일)
                let start = year_bounds(e.year()).0;
                Self { start, end: e }
            }
            (Some(s), Some(e)) => Self { start: s, end: e },
        }
    }

    /// 주어진 날짜가 이 범위 안에 있는지 검사합니다 (양 끝 포함).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// 통계 응답 문서 — 모든 호출자(API, 대시보드)에게 반환되는 최종 결과입니다.
///
/// 직렬화하면 프런트엔드 JavaScript가 소비하는 JSON 계약과 정확히 일치합니다:
/// ```json
/// {
///   "currently_reading": [{"title": "...", "author": "...", "pages": null}],
///   "books_read_count": 26,
///   "date_range": {"start": "2025-01-01", "end": "2025-12-31"},
///   "goal": { "target": 12, "progress": 26, "percentage": 217, ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsDocument {
    /// 현재 읽는 중인 책 목록 (입력 순서 유지)
    pub currently_reading: Vec<CurrentlyReadingEntry>,
    /// 범위 내에 다 읽은 책 수
    pub books_read_count: i64,
    /// 집계에 사용된 (해석 완료된) 날짜 범위
    pub date_range: DateRange,
    /// 범위와 겹치는 독서 목표 — 없으면 JSON에서 null로 직렬화됩니다.
    pub goal: Option<ReadingGoal>,
}

// ── 테스트 ──
// #[cfg(test)]: 이 모듈은 `cargo test`로 테스트를 실행할 때만 컴파일됩니다.
// 일반 빌드에는 포함되지 않으므로 바이너리 크기에 영향이 없습니다.
#[cfg(test)]
mod tests {
    // use super::*: 부모 모듈(stats)의 모든 항목을 테스트 스코프로 가져옵니다.
    use super::*;

    /// 테스트용 날짜를 간단히 만드는 헬퍼
    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn resolve_defaults_to_current_year() {
        // 날짜를 하나도 안 보내면 → 오늘이 속한 해 전체
        let range = DateRange::resolve(None, None, d(2025, 8, 5));
        assert_eq!(range.start, d(2025, 1, 1));
        assert_eq!(range.end, d(2025, 12, 31));
    }

    #[test]
    fn resolve_start_only_fills_end_of_start_year() {
        // 시작일만 보내면 → 종료일은 "시작일이 속한 해"의 12월 31일
        // (오늘이 2025년이어도 2023년 범위를 요청했으면 2023-12-31로 채워야 함)
        let range = DateRange::resolve(Some(d(2023, 3, 1)), None, d(2025, 8, 5));
        assert_eq!(range.start, d(2023, 3, 1));
        assert_eq!(range.end, d(2023, 12, 31));
    }

    #[test]
    fn resolve_end_only_fills_start_of_end_year() {
        // 종료일만 보내면 → 시작일은 "종료일이 속한 해"의 1월 1일
        let range = DateRange::resolve(None, Some(d(2024, 6, 30)), d(2025, 8, 5));
        assert_eq!(range.start, d(2024, 1, 1));
        assert_eq!(range.end, d(2024, 6, 30));
    }

    #[test]
    fn resolve_keeps_explicit_pair_untouched() {
        // 둘 다 보내면 그대로 사용 (뒤집힌 범위의 검증은 집계기의 몫)
        let range = DateRange::resolve(Some(d(2025, 6, 1)), Some(d(2025, 1, 1)), d(2025, 8, 5));
        assert_eq!(range.start, d(2025, 6, 1));
        assert_eq!(range.end, d(2025, 1, 1));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let range = DateRange {
            start: d(2024, 1, 1),
            end: d(2024, 6, 30),
        };
        assert!(range.contains(d(2024, 1, 1)));  // 시작일 포함
        assert!(range.contains(d(2024, 6, 30))); // 종료일 포함
        assert!(!range.contains(d(2024, 7, 1))); // 종료일 바로 다음 날은 제외
        assert!(!range.contains(d(2023, 12, 31)));
    }

    #[test]
    fn date_range_serializes_as_iso_strings() {
        // API 계약 확인: 날짜가 "YYYY-MM-DD" 문자열로 직렬화되어야
        // 프런트엔드 JavaScript가 그대로 사용할 수 있습니다.
        let range = DateRange {
            start: d(2025, 1, 1),
            end: d(2025, 12, 31),
        };
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"start": "2025-01-01", "end": "2025-12-31"})
        );
    }
}
