//! # 서비스(비즈니스 로직) 계층
//!
//! HTTP와 무관한 핵심 로직을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)는 요청을 해석해 이 계층의 함수를 호출하고,
//! 결과를 HTTP 응답으로 포장하는 일만 합니다.
//!
//! 이렇게 분리해 두면 같은 로직을 HTTP 핸들러뿐 아니라
//! CLI 도구나 배치 작업 등 다른 호출자도 그대로 재사용할 수 있습니다.
//!
//! 각 하위 모듈:
//! - `hardcover`: Hardcover GraphQL API 클라이언트 (업스트림 데이터 가져오기)
//! - `stats`: 독서 통계 집계 (순수 함수 — 이 애플리케이션의 핵심)

pub mod hardcover;
pub mod stats;

// 하위 모듈의 주요 항목을 재공개(re-export)하여
// `crate::services::compute_stats`처럼 바로 접근할 수 있게 합니다.
pub use hardcover::*;
pub use stats::*;
