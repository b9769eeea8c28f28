use crate::config::UploadConfig;
use crate::helpers::decoding::decode_ledger;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Result as ActixResult};
use futures::StreamExt;
use shared_types::{CalculateRequest, ErrorResponse, UploadResponse};
use tracing::{info, warn};
use warikan_core::{calculate, LedgerReader};

const FILE_FIELD: &str = "file";
const MISSING_FILE: &str = "ファイルの取得に失敗しました";
const UNREADABLE_CSV: &str = "CSVファイルの読み込みに失敗しました";

#[derive(Clone)]
pub struct UploadAppState {
    pub upload: UploadConfig,
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

fn too_large(max_size: usize) -> String {
    format!("ファイルサイズが{}MBを超えています", max_size / (1024 * 1024))
}

pub async fn upload_ledger(
    state: web::Data<UploadAppState>,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let max_size = state.upload.max_file_size_bytes;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = payload.next().await {
        let mut field = match field {
            Ok(field) => field,
            Err(e) => {
                warn!("Failed to read multipart field: {}", e);
                return Ok(bad_request(MISSING_FILE));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Failed to read uploaded file: {}", e);
                    return Ok(bad_request(MISSING_FILE));
                }
            };

            if bytes.len() + chunk.len() > max_size {
                warn!(max_size, "Uploaded file exceeds size limit");
                return Ok(bad_request(too_large(max_size)));
            }
            bytes.extend_from_slice(&chunk);
        }

        content = Some(bytes);
        break;
    }

    let Some(content) = content else {
        return Ok(bad_request(MISSING_FILE));
    };

    info!(size = content.len(), "Received ledger upload");

    let text = match decode_ledger(&content, &state.upload.encoding) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to decode ledger: {}", e);
            return Ok(bad_request(UNREADABLE_CSV));
        }
    };

    let (headers, records) = match LedgerReader::new().read_ledger(text.as_bytes()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Failed to read ledger: {}", e);
            return Ok(bad_request(UNREADABLE_CSV));
        }
    };

    info!(records = records.len(), "Parsed ledger upload");

    Ok(HttpResponse::Ok().json(UploadResponse { headers, records }))
}

pub async fn calculate_settlement(
    request: web::Json<CalculateRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    info!(records = request.records.len(), "Received calculation request");

    let result = calculate(&request.records, &request.settings);

    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use actix_web::{http::header, http::StatusCode, test, App};
    use encoding_rs::SHIFT_JIS;
    use shared_types::{CalculationResult, CalculationTarget, SettlementDirection};

    const BOUNDARY: &str = "warikan-test-boundary";

    const LEDGER: &str = "計算対象,日付,内容,金額（円）,保有金融機関,大項目,中項目,メモ,振替,ID
1,2024/01/05,スーパー,\"-7,000\",夫カード,食費,食料品,,0,a1
1,2024/01/10,給与,300000,銀行,収入,給与,,0,a2
1,2024/01/12,本,-3000,妻カード,教養・教育,書籍,,0,a3
short,row
";

    fn app_config(max_file_size_bytes: usize) -> ApiConfig {
        let mut config = ApiConfig::default();
        config.upload = Some(UploadConfig {
            max_file_size_bytes,
            ..UploadConfig::default()
        });
        config
    }

    fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"ledger.csv\"\r\nContent-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(field: &str, content: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(field, content))
    }

    #[actix_web::test]
    async fn test_upload_shift_jis_ledger() {
        let config = app_config(1024 * 1024);
        let app = test::init_service(App::new().configure(|cfg| crate::handlers::configure(cfg, &config))).await;

        let (encoded, _, _) = SHIFT_JIS.encode(LEDGER);
        let resp = test::call_service(&app, upload_request("file", &encoded).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: UploadResponse = test::read_body_json(resp).await;
        assert_eq!(body.headers.len(), 10);
        assert_eq!(body.headers[1], "日付");
        assert_eq!(body.records.len(), 3);
        assert_eq!(body.records[0].amount, -7000);
        assert_eq!(body.records[0].institution, "夫カード");
        assert_eq!(body.records[1].amount, 300000);
        assert_eq!(body.records[0].calculation_target, "1");
    }

    #[actix_web::test]
    async fn test_upload_without_file_field() {
        let config = app_config(1024 * 1024);
        let app = test::init_service(App::new().configure(|cfg| crate::handlers::configure(cfg, &config))).await;

        let resp = test::call_service(&app, upload_request("other", b"a,b").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "ファイルの取得に失敗しました");
    }

    #[actix_web::test]
    async fn test_upload_too_large() {
        let config = app_config(1024 * 1024);
        let app = test::init_service(App::new().configure(|cfg| crate::handlers::configure(cfg, &config))).await;

        let content = vec![b'a'; 1024 * 1024 + 1];
        let resp = test::call_service(&app, upload_request("file", &content).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "ファイルサイズが1MBを超えています");
    }

    #[actix_web::test]
    async fn test_calculate() {
        let config = app_config(1024 * 1024);
        let app = test::init_service(App::new().configure(|cfg| crate::handlers::configure(cfg, &config))).await;

        let payload = serde_json::json!({
            "records": [
                {"calculation_target": "1", "date": "2024/01/05", "content": "スーパー", "amount": -7000,
                 "institution": "夫カード", "large_category": "食費", "medium_category": "食料品",
                 "memo": "", "transfer": "0", "id": "a1"},
                {"calculation_target": "1", "date": "2024/01/10", "content": "給与", "amount": 300000,
                 "institution": "銀行", "large_category": "収入", "medium_category": "給与",
                 "memo": "", "transfer": "0", "id": "a2"},
                {"calculation_target": "1", "date": "2024/01/12", "content": "本", "amount": -3000,
                 "institution": "妻カード", "large_category": "教養・教育", "medium_category": "書籍",
                 "memo": "", "transfer": "0", "id": "a3"}
            ],
            "settings": {
                "identification_column": "内容",
                "owner_pattern": "スーパー",
                "spouse_pattern": "本",
                "owner_ratio": 60,
                "spouse_ratio": 40
            }
        });

        let req = test::TestRequest::post()
            .uri("/api/calculate")
            .set_json(&payload)
            .to_request();
        let result: CalculationResult = test::call_and_read_body_json(&app, req).await;

        assert_eq!(result.period, "2024/01/05 〜 2024/01/12");
        assert_eq!(result.owner_total, 7000);
        assert_eq!(result.spouse_total, 3000);
        assert_eq!(result.owner_share, 6000);
        assert_eq!(result.spouse_share, 4000);
        assert_eq!(result.settlement_amount, 1000);
        assert_eq!(result.settlement_direction, SettlementDirection::SpouseToOwner);
        assert_eq!(result.records[0].classification(), Some(CalculationTarget::Owner));
        assert_eq!(result.records[1].calculation_target, "1");
        assert_eq!(result.records[2].classification(), Some(CalculationTarget::Spouse));
    }

    #[actix_web::test]
    async fn test_calculate_rejects_malformed_json() {
        let config = app_config(1024 * 1024);
        let app = test::init_service(App::new().configure(|cfg| crate::handlers::configure(cfg, &config))).await;

        let req = test::TestRequest::post()
            .uri("/api/calculate")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"records\": [")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "リクエストの解析に失敗しました");
    }
}
