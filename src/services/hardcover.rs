//! # Hardcover API 클라이언트
//!
//! Hardcover의 GraphQL API에서 사용자의 서재(책 레코드)와 독서 목표를
//! 받아와 내부 모델로 변환하는 모듈입니다.
//!
//! ## GraphQL 호출이란?
//! GraphQL은 별도의 프로토콜이 아니라, "query" 문자열을 JSON 본문에 담아
//! 보내는 **POST 요청**일 뿐입니다. 조회(query)도 항상 POST를 사용합니다.
//!
//! ## 이 모듈의 역할 분담
//! - `HardcoverClient`: HTTP 통신 담당 (비동기, reqwest)
//! - `shape_library()`: 중첩된 응답을 평평한 내부 모델로 변환 (순수 함수)
//!
//! 통계 집계(services::stats)는 이 모듈이 반환한 레코드만 받으므로,
//! 업스트림 API의 응답 구조가 바뀌어도 집계 로직은 영향을 받지 않습니다.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{GoalConfig, ReadingStatus, UserBookRecord};

/// 서재 조회 GraphQL 쿼리
///
/// - `me`: 토큰 소유자(로그인한 사용자)의 데이터
/// - `user_books`: 사용자가 서재에 담은 모든 책 (상태/완독일 포함)
/// - `goals`: 등록된 독서 목표들
///
/// 상태나 날짜로 거르는 조건은 일부러 넣지 않았습니다.
/// 필터링과 집계는 전부 우리 쪽(services::stats)에서 수행하므로,
/// 날짜 범위가 바뀌어도 쿼리는 항상 동일합니다.
const LIBRARY_QUERY: &str = r#"
query {
  me {
    user_books {
      status_id
      reviewed_at
      book {
        title
        pages
        contributions {
          author {
            name
          }
        }
      }
    }
    goals {
      description
      goal
      progress
      start_date
      end_date
    }
  }
}
"#;

/// 업스트림에서 받아온 서재 전체 — 통계 집계의 입력 묶음입니다.
#[derive(Debug, Clone)]
pub struct Library {
    /// 사용자-책 레코드 목록 (업스트림이 준 순서 그대로)
    pub books: Vec<UserBookRecord>,
    /// 등록된 독서 목표 목록
    pub goals: Vec<GoalConfig>,
}

/// Hardcover API 클라이언트
///
/// reqwest::Client는 내부적으로 커넥션 풀을 가지고 있으므로,
/// 요청마다 새로 만들지 않고 서버 시작 시 한 번 만들어 공유합니다.
/// (Clone해도 실제 풀이 복제되지 않고 같은 풀을 가리킵니다)
#[derive(Clone)]
pub struct HardcoverClient {
    /// 공유 HTTP 클라이언트 (커넥션 풀 내장)
    http: reqwest::Client,
    /// GraphQL 엔드포인트 주소
    url: String,
    /// 인증 토큰 — Hardcover는 Authorization 헤더에 토큰을 그대로 받습니다.
    /// ("Bearer xxx"가 아니라 "xxx" 형태)
    token: String,
}

impl HardcoverClient {
    /// 설정값으로 클라이언트를 생성합니다.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.hardcover_url.clone(),
            token: config.hardcover_token.clone(),
        }
    }

    /// 사용자의 서재(책 레코드 + 목표)를 받아옵니다.
    ///
    /// # 반환값
    /// - `Ok(Library)`: 내부 모델로 변환된 서재
    /// - `Err(AppError::Upstream)`: 네트워크/HTTP 수준의 실패
    /// - `Err(AppError::UpstreamData)`: 응답은 왔지만 모양이 기대와 다른 경우
    pub async fn fetch_library(&self) -> Result<Library, AppError> {
        tracing::debug!("Fetching library from {}", self.url);

        // GraphQL 요청: 쿼리 문자열을 JSON 본문의 "query" 필드에 담아 POST
        let response = self
            .http
            .post(&self.url)
            // .header(): Authorization 헤더에 토큰을 그대로 설정
            .header(reqwest::header::AUTHORIZATION, &self.token)
            // .json(): 본문을 JSON으로 직렬화하고 Content-Type 헤더도 설정
            .json(&json!({ "query": LIBRARY_QUERY }))
            .send()
            .await? // 네트워크 실패 → AppError::Upstream (#[from] 변환)
            // HTTP 4xx/5xx 상태 코드를 에러로 바꿉니다.
            // (reqwest는 기본적으로 500 응답도 Ok로 취급하기 때문)
            .error_for_status()?;

        // 응답 본문을 GraphqlResponse 구조체로 역직렬화합니다.
        // ::<GraphqlResponse>: 터보피시(turbofish) 문법 — 타입을 명시적으로 지정
        let body = response.json::<GraphqlResponse>().await?;

        // HTTP 통신과 응답 해석을 분리했으므로, 여기서부터는 순수 함수입니다.
        shape_library(body)
    }
}

// ── 업스트림 응답 구조체 (DTO) ──
// GraphQL 응답의 중첩 구조를 그대로 본뜬 역직렬화 전용 구조체들입니다.
// 이 모듈 밖으로는 노출하지 않습니다 (pub 없음) —
// 바깥 세상은 UserBookRecord / GoalConfig만 알면 됩니다.
// serde는 선언하지 않은 필드를 무시하므로, 응답에 필드가 더 있어도 괜찮습니다.

/// GraphQL 응답의 최상위 구조: { "data": {...}, "errors": [...] }
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    /// 쿼리 결과 (에러 시 없을 수 있음)
    data: Option<ResponseData>,
    /// GraphQL 수준의 에러 목록 (HTTP 200이어도 에러가 올 수 있음!)
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    /// me는 단일 객체가 아니라 원소 1개짜리 리스트로 옵니다 (Hardcover 응답 형식)
    me: Vec<MeNode>,
}

#[derive(Debug, Deserialize)]
struct MeNode {
    #[serde(default)] // 필드가 없으면 빈 Vec으로 처리
    user_books: Vec<RawUserBook>,
    #[serde(default)]
    goals: Vec<RawGoal>,
}

#[derive(Debug, Deserialize)]
struct RawUserBook {
    status_id: i64,
    /// 완독(리뷰) 날짜 — 내부 모델의 finished_at이 됩니다.
    reviewed_at: Option<NaiveDate>,
    book: RawBook,
}

#[derive(Debug, Deserialize)]
struct RawBook {
    title: String,
    pages: Option<i64>,
    #[serde(default)]
    contributions: Vec<RawContribution>,
}

#[derive(Debug, Deserialize)]
struct RawContribution {
    author: Option<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: String,
}

/// 업스트림의 목표 객체. 목표 권수 필드 이름이 "goal"입니다.
/// progress 필드도 응답에 함께 오지만 역직렬화하지 않습니다 —
/// 진행 권수는 집계기가 레코드에서 직접 세기 때문입니다.
#[derive(Debug, Deserialize)]
struct RawGoal {
    goal: i64,
    description: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// 중첩된 GraphQL 응답을 평평한 내부 모델(Library)로 변환합니다.
///
/// 순수 함수이므로 네트워크 없이 고정된 JSON으로 테스트할 수 있습니다.
fn shape_library(body: GraphqlResponse) -> Result<Library, AppError> {
    // GraphQL은 HTTP 200으로도 에러를 반환할 수 있으므로 errors 배열부터 확인합니다.
    if let Some(errors) = body.errors {
        if !errors.is_empty() {
            // 에러 메시지들을 "; "로 이어붙여 하나의 문자열로 만듭니다.
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(AppError::UpstreamData(messages.join("; ")));
        }
    }

    // .ok_or_else(): Option이 None이면 지정한 에러를 반환 (Option → Result 변환)
    let data = body
        .data
        .ok_or_else(|| AppError::UpstreamData("response has no data field".to_string()))?;

    // me 리스트의 첫 번째 원소가 로그인한 사용자입니다.
    // .into_iter().next(): Vec의 첫 원소를 소유권째 꺼냅니다 (clone 불필요)
    let me = data
        .me
        .into_iter()
        .next()
        .ok_or_else(|| AppError::UpstreamData("response has no me entry".to_string()))?;

    // 책 레코드 변환 — 업스트림이 준 순서를 그대로 유지합니다.
    let books = me.user_books.into_iter().map(shape_book).collect();

    // 목표 변환 — 필드 이름만 내부 모델에 맞게 바꿉니다 (goal → target)
    let goals = me
        .goals
        .into_iter()
        .map(|raw| GoalConfig {
            target: raw.goal,
            description: raw.description,
            start_date: raw.start_date,
            end_date: raw.end_date,
        })
        .collect();

    Ok(Library { books, goals })
}

/// 업스트림 책 레코드 하나를 내부 모델로 변환합니다.
fn shape_book(raw: RawUserBook) -> UserBookRecord {
    // 구조 분해(destructuring): 필드들을 개별 변수로 풀어냅니다.
    // contributions를 아래에서 소비(move)하므로 미리 분리해 둡니다.
    let RawBook {
        title,
        pages,
        contributions,
    } = raw.book;

    // 저자 이름: 첫 번째 기여자(contribution)의 author.name을 사용하고,
    // 기여자 정보가 아예 없으면 "Unknown"으로 대체합니다.
    // .and_then(): Option 체인 — 중간에 None이 나오면 전체가 None
    let author = contributions
        .into_iter()
        .next()
        .and_then(|contribution| contribution.author)
        .map(|author| author.name)
        .unwrap_or_else(|| "Unknown".to_string());

    UserBookRecord {
        status: ReadingStatus::from_status_id(raw.status_id),
        title,
        author,
        pages,
        // 서재 요약 쿼리는 읽기 시작일을 요청하지 않으므로 항상 None입니다.
        started_at: None,
        finished_at: raw.reviewed_at,
    }
}

// ── 테스트 ──
// 네트워크 없이, 실제 응답을 본뜬 고정 JSON으로 변환 로직만 검증합니다.
#[cfg(test)]
mod tests {
    use super::*;

    /// 실제 Hardcover 응답 구조를 본뜬 테스트 픽스처
    const LIBRARY_FIXTURE: &str = r#"
    {
      "data": {
        "me": [
          {
            "user_books": [
              {
                "status_id": 2,
                "reviewed_at": null,
                "book": {
                  "title": "The Left Hand of Darkness",
                  "pages": 304,
                  "contributions": [
                    { "author": { "name": "Ursula K. Le Guin" } }
                  ]
                }
              },
              {
                "status_id": 3,
                "reviewed_at": "2025-03-15",
                "book": {
                  "title": "Anonymous Anthology",
                  "pages": null,
                  "contributions": []
                }
              },
              {
                "status_id": 1,
                "reviewed_at": null,
                "book": {
                  "title": "Someday",
                  "pages": 250,
                  "contributions": [
                    { "author": { "name": "Future Author" } }
                  ]
                }
              },
              {
                "status_id": 99,
                "reviewed_at": null,
                "book": {
                  "title": "Mystery Status",
                  "pages": 100,
                  "contributions": []
                }
              }
            ],
            "goals": [
              {
                "description": "2025 Reading Goal",
                "goal": 12,
                "progress": 26,
                "start_date": "2025-01-01",
                "end_date": "2025-12-31"
              }
            ]
          }
        ]
      }
    }
    "#;

    fn parse(fixture: &str) -> GraphqlResponse {
        serde_json::from_str(fixture).unwrap()
    }

    #[test]
    fn shapes_books_with_status_and_finish_date() {
        let library = shape_library(parse(LIBRARY_FIXTURE)).unwrap();
        assert_eq!(library.books.len(), 4);

        // status_id 2 → 읽는 중
        assert_eq!(library.books[0].status, ReadingStatus::CurrentlyReading);
        assert_eq!(library.books[0].title, "The Left Hand of Darkness");
        assert_eq!(library.books[0].author, "Ursula K. Le Guin");
        assert_eq!(library.books[0].pages, Some(304));

        // status_id 3 → 다 읽음, reviewed_at이 finished_at으로 매핑됨
        assert_eq!(library.books[1].status, ReadingStatus::Completed);
        assert_eq!(
            library.books[1].finished_at,
            NaiveDate::from_ymd_opt(2025, 3, 15)
        );

        // status_id 1 → 읽고 싶음, 모르는 status_id → Other
        assert_eq!(library.books[2].status, ReadingStatus::WantToRead);
        assert_eq!(library.books[3].status, ReadingStatus::Other);
    }

    #[test]
    fn missing_contributions_fall_back_to_unknown_author() {
        let library = shape_library(parse(LIBRARY_FIXTURE)).unwrap();
        // 기여자 정보가 빈 배열이면 저자는 "Unknown"
        assert_eq!(library.books[1].author, "Unknown");
        // 페이지 수 null은 None으로 그대로 전달 (0으로 바꾸지 않음)
        assert_eq!(library.books[1].pages, None);
    }

    #[test]
    fn shapes_goals_with_renamed_target_field() {
        let library = shape_library(parse(LIBRARY_FIXTURE)).unwrap();
        assert_eq!(library.goals.len(), 1);
        // 업스트림의 "goal" 필드가 내부 모델의 target이 됩니다.
        assert_eq!(library.goals[0].target, 12);
        assert_eq!(library.goals[0].description, "2025 Reading Goal");
        assert_eq!(
            library.goals[0].start_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn graphql_errors_become_upstream_data_errors() {
        // HTTP 200이어도 errors 배열이 있으면 실패로 처리해야 합니다.
        let body = parse(r#"{ "errors": [ { "message": "unauthorized" } ] }"#);
        let result = shape_library(body);
        assert!(matches!(result, Err(AppError::UpstreamData(_))));
    }

    #[test]
    fn empty_me_list_is_an_upstream_data_error() {
        let body = parse(r#"{ "data": { "me": [] } }"#);
        let result = shape_library(body);
        assert!(matches!(result, Err(AppError::UpstreamData(_))));
    }

    #[test]
    fn missing_data_field_is_an_upstream_data_error() {
        let body = parse(r#"{}"#);
        let result = shape_library(body);
        assert!(matches!(result, Err(AppError::UpstreamData(_))));
    }
}
