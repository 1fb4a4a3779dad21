//! # 독서 통계 집계 서비스
//!
//! 업스트림에서 받아온 책 레코드 목록을 통계 응답 문서로 변환하는
//! 순수 함수들을 제공합니다. 이 모듈이 이 애플리케이션의 핵심 로직입니다.
//!
//! 이 모듈의 함수들:
//! - `compute_stats()`: 레코드 + 날짜 범위 + 목표 → 통계 문서 (오늘 날짜 기준)
//! - `compute_stats_at()`: 위와 같지만 "오늘"을 매개변수로 받는 버전 (테스트용)
//!
//! ## 설계: 순수 함수
//! 집계는 입력만 읽고 출력만 만드는 **순수(pure) 함수**입니다.
//! 네트워크도 파일도 건드리지 않으므로 async가 필요 없고,
//! 공유 상태가 없으므로 여러 요청이 동시에 호출해도 안전합니다.
//! HTTP 핸들러뿐 아니라 CLI든 배치 작업이든 어떤 호출자도 재사용할 수 있습니다.

use chrono::{Local, NaiveDate};

use crate::error::AppError;
use crate::models::{
    CurrentlyReadingEntry, DateRange, GoalConfig, ReadingGoal, ReadingStatus, StatsDocument,
    UserBookRecord,
};

/// 책 레코드들을 통계 문서로 집계합니다.
///
/// # 매개변수
/// - `records`: 업스트림에서 받아온 사용자-책 레코드 목록 (빈 목록도 정상 입력)
/// - `range`: 집계 대상 기간. None이면 올해 전체(1월 1일~12월 31일)가 기본값
/// - `goals`: 업스트림에 등록된 독서 목표 목록
///
/// # 반환값
/// - `Ok(StatsDocument)`: 집계 결과
/// - `Err(AppError::InvalidRange)`: 시작일이 종료일보다 뒤인 경우
/// - `Err(AppError::InvalidGoal)`: 적용되는 목표의 target이 0 이하인 경우
pub fn compute_stats(
    records: &[UserBookRecord],
    range: Option<DateRange>,
    goals: &[GoalConfig],
) -> Result<StatsDocument, AppError> {
    // Local::now(): 서버의 로컬 시간대 기준 현재 시각
    // .date_naive(): 시각에서 날짜 부분만 추출 (NaiveDate)
    compute_stats_at(records, range, goals, Local::now().date_naive())
}

/// `compute_stats`의 실제 구현 — "오늘"을 명시적으로 받습니다.
///
/// 현재 날짜를 함수 안에서 읽으면 테스트 결과가 실행 시점에 따라 달라지므로,
/// 기본 범위 계산에 쓰이는 기준 날짜를 매개변수로 분리했습니다.
/// 프로덕션 코드는 `compute_stats`를, 테스트는 이 함수를 호출합니다.
pub fn compute_stats_at(
    records: &[UserBookRecord],
    range: Option<DateRange>,
    goals: &[GoalConfig],
    today: NaiveDate,
) -> Result<StatsDocument, AppError> {
    // ── 1단계: 날짜 범위 확정 ──
    // unwrap_or_else(): Option이 None일 때 클로저를 실행해 기본값을 만듭니다.
    let range = range.unwrap_or_else(|| DateRange::current_year(today));

    // 뒤집힌 범위는 호출자의 입력 오류입니다.
    // 조용히 시작/종료를 맞바꾸지 않고 에러로 돌려보냅니다.
    if range.start > range.end {
        return Err(AppError::InvalidRange(format!(
            "start {} is after end {}",
            range.start, range.end
        )));
    }

    // ── 2단계: 현재 읽는 중인 책 목록 ──
    // 이 목록은 "지금 상태"를 보여주므로 날짜 범위로 거르지 않습니다.
    // .filter() → .map() → .collect(): 이터레이터 체인.
    // Python의 리스트 컴프리헨션과 비슷하지만 중간 리스트를 만들지 않습니다.
    // 입력 순서가 그대로 유지됩니다 (이터레이터는 순서를 바꾸지 않음).
    let currently_reading: Vec<CurrentlyReadingEntry> = records
        .iter()
        .filter(|record| record.status == ReadingStatus::CurrentlyReading)
        .map(|record| CurrentlyReadingEntry {
            title: record.title.clone(),
            author: record.author.clone(),
            // Option<i64>는 Copy이므로 clone 없이 그대로 복사됩니다.
            // None(페이지 수 없음)은 그대로 None으로 전달 → JSON에서 null
            pages: record.pages,
        })
        .collect();

    // ── 3단계: 기간 내 완독 권수 ──
    // "다 읽음" 상태이면서 완독일이 범위 안(양 끝 포함)에 있는 레코드만 셉니다.
    // .is_some_and(): Option이 Some이고 그 값이 조건을 만족하는지 검사.
    // 완독일이 없는(None) 레코드는 상태가 "다 읽음"이어도 세지 않습니다.
    let books_read_count = records
        .iter()
        .filter(|record| {
            record.status == ReadingStatus::Completed
                && record.finished_at.is_some_and(|date| range.contains(date))
        })
        .count() as i64; // usize → i64 변환 (JSON 숫자로 직렬화하기 위해)

    // ── 4단계: 독서 목표 평가 ──
    // .find(): 조건을 만족하는 첫 번째 항목을 Option으로 반환합니다.
    // 목표 기간이 집계 범위와 겹치는(overlap) 첫 목표를 적용합니다.
    // 겹침 판정: 목표 시작 <= 범위 끝 AND 목표 끝 >= 범위 시작
    let active_goal = goals
        .iter()
        .find(|goal| goal.start_date <= range.end && goal.end_date >= range.start);

    // Option<&GoalConfig> → Option<ReadingGoal> 변환.
    // 중간에 에러가 날 수 있으므로(목표 설정 오류) match로 펼쳐서 처리합니다.
    let goal = match active_goal {
        Some(config) => Some(evaluate_goal(config, books_read_count)?),
        None => None,
    };

    Ok(StatsDocument {
        currently_reading,
        books_read_count,
        date_range: range,
        goal,
    })
}

/// 목표 설정에 진행률과 달성률을 계산해 붙입니다.
///
/// 달성률은 100을 넘을 수 있습니다 — 목표 12권에 26권을 읽었다면 217%입니다.
/// 초과 달성을 100으로 깎지 않습니다.
///
/// # 에러
/// `target <= 0`이면 `InvalidGoal`을 반환합니다.
/// 0으로 나누는 연산을 수행하기 전에 설정 오류로 분류합니다.
fn evaluate_goal(config: &GoalConfig, progress: i64) -> Result<ReadingGoal, AppError> {
    if config.target <= 0 {
        return Err(AppError::InvalidGoal(format!(
            "goal '{}' has non-positive target {}",
            config.description, config.target
        )));
    }

    // 정수 나눗셈은 소수점을 버리므로 f64로 변환해 계산한 뒤 반올림합니다.
    // 예: 26 / 12 * 100 = 216.66... → round → 217
    let percentage = (progress as f64 / config.target as f64 * 100.0).round() as i64;

    Ok(ReadingGoal {
        target: config.target,
        progress,
        percentage,
        description: config.description.clone(),
        start_date: config.start_date,
        end_date: config.end_date,
    })
}
