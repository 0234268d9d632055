use crate::config::{CatalogSettings, FieldPaths};
use crate::domain::model::{ClassSection, SeatCount};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{Result, TrackerError};
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde_json::Value;

pub struct CatalogClient {
    client: Client,
    settings: CatalogSettings,
}

impl CatalogClient {
    pub fn new(settings: CatalogSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: CatalogSettings) -> Self {
        Self { client, settings }
    }

    /// 沒有 `Bearer ` 前綴就補上
    fn authorization_header(&self) -> Option<String> {
        let token = self.settings.token.as_deref()?.trim();
        if token.is_empty() {
            return None;
        }
        let has_scheme = token
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
        if has_scheme {
            Some(token.to_string())
        } else {
            Some(format!("Bearer {}", token))
        }
    }

    /// GET catalog 搜尋結果並解析成 JSON
    pub async fn fetch(&self) -> Result<Value> {
        let mut request = self
            .client
            .get(&self.settings.url)
            .header(USER_AGENT, &self.settings.user_agent);

        if let Some(auth) = self.authorization_header() {
            request = request.header(AUTHORIZATION, auth);
        }

        for (key, value) in &self.settings.parameters {
            request = request.query(&[(key, value)]);
        }

        if let Some(timeout) = self.settings.timeout_secs {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        tracing::debug!("📡 Making catalog request to: {}", self.settings.url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 Catalog response status: {}", status);

        if !status.is_success() {
            return Err(TrackerError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.settings.url.clone(),
            });
        }

        let body = response.text().await?;
        let json = serde_json::from_str(&body)?;
        Ok(json)
    }
}

#[async_trait::async_trait]
impl CatalogSource for CatalogClient {
    async fn find_section(&self, class_number: &str) -> Result<Option<ClassSection>> {
        let json = self.fetch().await?;
        find_section(&json, class_number, &self.settings.fields)
    }
}

/// 依點分隔路徑取值，例如 `seatInfo.ENRL_CAP`
pub fn value_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| current.get(segment))
}

/// 數字或數字字串都接受；負數、缺值、無法解析一律當 0
pub fn read_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

fn class_number_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 在搜尋結果中找指定的 class number。
///
/// 根節點必須是物件。缺少 classes 陣列視為空結果；classes 存在但不是陣列則是格式錯誤。
pub fn find_section(
    json: &Value,
    class_number: &str,
    paths: &FieldPaths,
) -> Result<Option<ClassSection>> {
    if !json.is_object() {
        return Err(TrackerError::MalformedResponse {
            message: format!(
                "response root should be an object, got {}",
                json_type_name(json)
            ),
        });
    }

    let classes = match value_at_path(json, &paths.classes) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(TrackerError::MalformedResponse {
                message: format!(
                    "`{}` should be an array, got {}",
                    paths.classes,
                    json_type_name(other)
                ),
            })
        }
    };

    let target = class_number.trim();
    let row = classes.iter().find(|row| {
        class_number_of(value_at_path(row, &paths.class_number)).as_deref() == Some(target)
    });

    let Some(row) = row else {
        return Ok(None);
    };

    let cap = read_count(value_at_path(row, &paths.enrollment_cap));
    let total = read_count(value_at_path(row, &paths.enrollment_total));

    let mut section = ClassSection::from_enrollment(target, cap, total);
    if let Some(seats_path) = &paths.seats_available {
        section.seats_available = SeatCount(read_count(value_at_path(row, seats_path)));
    }

    Ok(Some(section))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
