//! # 독서 통계 API 라우트 핸들러
//!
//! 독서 통계를 JSON으로 제공하는 HTTP 핸들러입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/reading-stats | `reading_stats` | 독서 통계 조회 |
//!
//! ## 쿼리 파라미터
//! - `start_date` (선택): ISO 날짜 문자열 (예: "2024-01-01")
//! - `end_date` (선택): ISO 날짜 문자열 (예: "2024-12-31")
//!
//! 예시:
//! - `/api/v1/reading-stats` → 올해 전체
//! - `/api/v1/reading-stats?start_date=2024-01-01&end_date=2024-06-30`
//!
//! ## Axum 핸들러 패턴
//! 핸들러는 Axum의 **추출자(Extractor)** 패턴을 따릅니다:
//! - `State(state)`: 애플리케이션 공유 상태 (Hardcover 클라이언트)
//! - `Query(query)`: URL 쿼리 문자열을 구조체로 파싱
//!
//! 반환 타입이 `Result<T, AppError>`이면, Axum이 자동으로:
//! - `Ok(T)` → T를 HTTP 응답으로 변환 (IntoResponse 트레이트 사용)
//! - `Err(AppError)` → AppError를 에러 JSON 응답으로 변환

use crate::{
    error::AppError,
    models::{DateRange, StatsDocument},
    services::{self, HardcoverClient}, // 업스트림 클라이언트 + 통계 집계
};
use axum::{
    extract::{Query, State}, // Axum 추출자: 쿼리 파라미터, 앱 상태 추출
    Json,                    // JSON 응답 래퍼
};
use chrono::NaiveDate;
use serde::Deserialize;

// #[derive(Clone)]: AppState가 Clone 트레이트를 구현하게 합니다.
// Axum의 State Extractor는 내부적으로 AppState를 clone하므로 필수입니다.
// HardcoverClient는 내부적으로 커넥션 풀을 공유하므로 clone 비용이 낮습니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘입니다.
#[derive(Clone)]
pub struct AppState {
    /// Hardcover API 클라이언트 (HTTP 커넥션 풀 내장)
    pub hardcover: HardcoverClient,
}

/// `GET /reading-stats`의 쿼리 파라미터
///
/// 둘 다 선택 사항이므로 Option 타입입니다.
/// String으로 받아서 직접 파싱하는 이유: 파싱 실패 시
/// "어느 파라미터가 왜 잘못됐는지"를 담은 명확한 400 응답을 만들기 위해서입니다.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// 집계 시작일 (ISO 형식, 예: "2024-01-01")
    pub start_date: Option<String>,
    /// 집계 종료일 (ISO 형식, 예: "2024-12-31")
    pub end_date: Option<String>,
}

/// `GET /reading-stats` — 독서 통계를 조회합니다.
///
/// 처리 흐름:
/// 1. 쿼리 파라미터의 날짜 문자열을 파싱 (형식이 틀리면 400)
/// 2. 일부만 온 날짜를 완전한 범위로 해석 (둘 다 없으면 집계기의 기본값에 맡김)
/// 3. Hardcover에서 서재를 받아옴 (유일한 I/O)
/// 4. 순수 함수인 집계기를 호출해 통계 문서 생성
/// 5. JSON으로 직렬화해 응답
///
/// # 반환값
/// `StatsDocument`가 그대로 JSON 응답 본문이 됩니다:
/// `{ "currently_reading": [...], "books_read_count": 26, "date_range": {...}, "goal": {...} }`
pub async fn reading_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsDocument>, AppError> {
    // ── 1단계: 날짜 파라미터 파싱 ──
    // .as_deref(): Option<String> → Option<&str> 변환 (소유권 이동 없이 내용만 빌림)
    let start = parse_date_param("start_date", query.start_date.as_deref())?;
    let end = parse_date_param("end_date", query.end_date.as_deref())?;

    // ── 2단계: 범위 해석 ──
    // 파라미터가 하나도 없으면 None을 넘겨서 기본 범위(올해 전체) 결정을
    // 집계기에 맡깁니다. 하나라도 있으면 빠진 쪽을 여기(호출자 계층)에서
    // 채웁니다 — 시작일만 오면 그 해의 12월 31일, 종료일만 오면 그 해의 1월 1일.
    let range = if start.is_none() && end.is_none() {
        None
    } else {
        Some(DateRange::resolve(
            start,
            end,
            chrono::Local::now().date_naive(),
        ))
    };

    tracing::debug!("Computing reading stats for range {:?}", range);

    // ── 3단계: 업스트림에서 서재 가져오기 ──
    let library = state.hardcover.fetch_library().await?;

    // ── 4단계: 통계 집계 (순수 함수, I/O 없음) ──
    let stats = services::compute_stats(&library.books, range, &library.goals)?;

    // ── 5단계: JSON 응답 ──
    Ok(Json(stats))
}

/// 쿼리 파라미터의 날짜 문자열을 NaiveDate로 파싱합니다.
///
/// # 매개변수
/// - `name`: 파라미터 이름 (에러 메시지에 사용)
/// - `value`: 파라미터 값 (없으면 None)
///
/// # 반환값
/// - `Ok(None)`: 파라미터가 오지 않음 (정상 — 선택 사항이므로)
/// - `Ok(Some(date))`: 파싱 성공
/// - `Err(AppError::BadRequest)`: 형식이 YYYY-MM-DD가 아님
fn parse_date_param(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value {
        None => Ok(None),
        // NaiveDate의 FromStr 구현은 ISO 형식("2024-01-01")을 파싱합니다.
        // .map(Some): Ok(date) → Ok(Some(date))
        // .map_err(): 파싱 에러를 사용자 친화적인 400 에러로 바꿉니다.
        Some(raw) => raw.parse::<NaiveDate>().map(Some).map_err(|_| {
            AppError::BadRequest(format!(
                "{} must be an ISO date (YYYY-MM-DD), got '{}'",
                name, raw
            ))
        }),
    }
}

// ── 테스트 ──
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_param_parses_to_none() {
        // 파라미터가 없는 것은 에러가 아닙니다 (선택 사항)
        assert_eq!(parse_date_param("start_date", None).unwrap(), None);
    }

    #[test]
    fn valid_iso_date_parses() {
        let parsed = parse_date_param("start_date", Some("2024-06-30")).unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn malformed_date_is_a_bad_request() {
        // 미국식 날짜, 자연어, 빈 문자열 모두 400으로 거부합니다.
        for raw in ["06/30/2024", "yesterday", "", "2024-13-01"] {
            let result = parse_date_param("end_date", Some(raw));
            assert!(
                matches!(result, Err(AppError::BadRequest(_))),
                "'{}' should be rejected",
                raw
            );
        }
    }
}
