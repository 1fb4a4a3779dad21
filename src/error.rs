//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환

use axum::{
    http::StatusCode,                     // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response},   // Axum의 응답 변환 트레이트
    Json,                                 // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]: 두 가지 derive 매크로를 적용합니다.
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 트레이트를 자동 구현.
//   #[error("...")] 어트리뷰트로 Display 트레이트(사람이 읽을 에러 메시지)도 자동 생성합니다.
//
// enum(열거형): 여러 가지 가능한 값 중 하나를 나타내는 타입.
// 다른 언어의 union type이나 sealed class와 비슷합니다.
// match 문으로 모든 경우를 빠짐없이 처리해야 합니다 (exhaustive matching).

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    // #[error("...")]: 이 variant의 Display 메시지를 정의합니다.
    // .to_string()이나 println!("{}", err)로 출력할 때 이 메시지가 사용됩니다.

    /// 잘못된 요청 (HTTP 400)
    /// String을 포함하여 구체적인 에러 메시지를 전달합니다.
    /// {0}은 첫 번째 필드(String)를 참조하는 포맷 문법입니다.
    /// 예: 쿼리 파라미터의 날짜 형식이 YYYY-MM-DD가 아닌 경우
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 잘못된 날짜 범위 (HTTP 400)
    /// 시작일이 종료일보다 뒤인 범위를 요청한 경우입니다.
    /// 호출자의 입력 오류이므로 조용히 보정하지 않고 에러로 알립니다.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// 잘못된 독서 목표 설정 (HTTP 500)
    /// 목표 권수(target)가 0 이하인 경우입니다. 0으로 나누기 전에 거릅니다.
    /// 요청 자체는 정상이고 Hardcover에 등록된 목표 데이터가 문제이므로
    /// 클라이언트 잘못(400)이 아닌 서버측 오류(500)로 분류합니다.
    #[error("Invalid goal configuration: {0}")]
    InvalidGoal(String),

    /// Hardcover API 통신 오류 (HTTP 502)
    /// #[from]: reqwest::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// 이를 통해 reqwest 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Upstream으로 변환됩니다.
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Hardcover 응답 형식 오류 (HTTP 502)
    /// 통신은 성공했지만 응답 본문이 기대한 모양이 아닌 경우입니다.
    /// (GraphQL errors 배열, data/me 누락 등)
    #[error("Upstream data error: {0}")]
    UpstreamData(String),
}

// impl IntoResponse for AppError:
// Axum의 IntoResponse 트레이트를 AppError에 구현합니다.
// 이를 통해 핸들러가 Err(AppError)를 반환하면,
// Axum이 자동으로 이 메서드를 호출하여 적절한 HTTP 응답을 생성합니다.
//
// 트레이트 구현(impl Trait for Type)은 Rust의 핵심 패턴입니다.
// 다른 언어의 인터페이스 구현(implements)과 비슷하지만,
// 기존 타입에 새 행동을 추가할 수 있다는 점이 다릅니다.
impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 각 에러 종류에 따라 적절한 HTTP 상태 코드와 JSON 에러 메시지를 생성합니다.
    /// 서버측 에러(Upstream, UpstreamData, InvalidGoal)는 실제 에러 내용을
    /// 로그에만 기록하고, 클라이언트에는 일반적인 메시지만 반환합니다 (보안을 위해).
    fn into_response(self) -> Response {
        // match: 패턴 매칭. enum의 각 variant에 대해 다른 처리를 합니다.
        // 모든 variant를 빠짐없이 처리해야 합니다 (exhaustive).
        // (status, code, message) 튜플을 반환합니다.
        let (status, code, message) = match self {
            // ref: 패턴 매칭에서 값을 이동(move)하지 않고 참조만 빌려옵니다.
            // Rust의 소유권(ownership) 시스템 때문에 필요합니다.
            // self가 이미 match에서 사용 중이므로, 내부 값은 참조로 접근합니다.
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::InvalidRange(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_range", msg.clone())
            }
            AppError::InvalidGoal(ref msg) => {
                // 목표 설정 오류는 로그에 기록 (서버 관리자용)
                tracing::error!("Invalid goal configuration: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "invalid_goal",
                    // 클라이언트에는 일반적인 메시지만 반환 (보안: 내부 구현 노출 방지)
                    "The configured reading goal is invalid".to_string(),
                )
            }
            AppError::Upstream(ref e) => {
                tracing::error!("Upstream error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "Failed to reach the Hardcover API".to_string(),
                )
            }
            AppError::UpstreamData(ref msg) => {
                tracing::error!("Upstream data error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_data_error",
                    "The Hardcover API returned an unexpected response".to_string(),
                )
            }
        };

        // JSON 응답 본문을 생성합니다.
        // json! 매크로: Rust 코드로 JSON 구조를 직관적으로 작성할 수 있게 합니다.
        // 결과: { "error": { "code": "invalid_range", "message": "..." } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // (StatusCode, Json<Value>)를 Response로 변환합니다.
        // Axum은 튜플 (상태코드, 본문)을 자동으로 HTTP 응답으로 변환합니다.
        // .into_response(): IntoResponse 트레이트의 메서드를 호출
        (status, body).into_response()
    }
}
