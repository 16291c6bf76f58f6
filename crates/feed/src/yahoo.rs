use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use folio_core::market::entity::{HistoryInterval, HistoryPeriod, PricePoint};
use folio_core::market::error::PriceError;
use folio_core::market::port::PriceSource;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// 报价保留的小数位
const PRICE_DP: u32 = 6;

/// # Summary
/// Yahoo Finance 报价源实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，单次请求 10 秒超时。
/// - 最新价取自 v8 chart 接口 `meta.regularMarketPrice`，
///   历史收盘价取自同一接口的 `indicators.quote[0].close`。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl YahooProvider {
    /// # Summary
    /// 创建一个新的 YahooProvider 实例。
    ///
    /// # Logic
    /// 1. 安装 ring 作为进程级 TLS 加密后端（已安装则跳过）。
    /// 2. 配置 10 秒超时。
    /// 3. 设置浏览器 User-Agent，Yahoo 会拒绝默认 UA。
    ///
    /// # Returns
    /// 客户端构建失败时返回 `PriceError::Network`。
    pub fn new() -> Result<Self, PriceError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| PriceError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// # Summary
    /// 请求 `chart/{asset}` 并解析为响应结构。
    ///
    /// # Logic
    /// 1. 资产代码作为单个路径段写入 URL，`/`、`?`、`#` 等字符被转义。
    /// 2. 404 视为未知资产，其它非 2xx 视为网络错误。
    async fn fetch_chart(
        &self,
        asset: &str,
        range: &str,
        interval: &str,
    ) -> Result<YahooResponse, PriceError> {
        let resp = self
            .client
            .get(chart_url(asset)?)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .map_err(|e| PriceError::Network(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Err(PriceError::UnknownAsset(asset.to_string())),
            status if !status.is_success() => {
                return Err(PriceError::Network(format!("HTTP {}", status)));
            }
            _ => {}
        }

        resp.json()
            .await
            .map_err(|e| PriceError::Parse(e.to_string()))
    }
}

/// 构造某个资产的 chart 接口地址
fn chart_url(asset: &str) -> Result<Url, PriceError> {
    let mut url = Url::parse(CHART_URL).map_err(|e| PriceError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| PriceError::Parse(format!("cannot build chart URL for {}", asset)))?
        .push(asset);
    Ok(url)
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口，只保留报价与收盘价所需的字段。
#[derive(Deserialize, Debug)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<YahooIndicators>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    regular_market_price: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Deserialize, Debug)]
struct YahooQuote {
    /// 收盘价列表，停牌或未收盘的位置为 null
    close: Vec<Option<f64>>,
}

/// # Logic
/// 非有限值或负值视为解析失败；合法值转为 `Decimal` 后保留 6 位小数并去掉尾零。
fn to_price(asset: &str, raw: f64) -> Result<Decimal, PriceError> {
    if !raw.is_finite() || raw < 0.0 {
        return Err(PriceError::Parse(format!(
            "invalid price {} for {}",
            raw, asset
        )));
    }

    Decimal::from_f64_retain(raw)
        .map(|d| d.round_dp(PRICE_DP).normalize())
        .ok_or_else(|| PriceError::Parse(format!("price {} for {} out of range", raw, asset)))
}

/// 接口带回 error 或 result 为空时视为未知资产，否则取第一条结果
fn first_result(asset: &str, response: YahooResponse) -> Result<YahooResult, PriceError> {
    if let Some(err) = response.chart.error {
        debug!(
            "Yahoo chart error for {}: {} {}",
            asset,
            err.code.unwrap_or_default(),
            err.description.unwrap_or_default()
        );
        return Err(PriceError::UnknownAsset(asset.to_string()));
    }

    response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| PriceError::UnknownAsset(asset.to_string()))
}

/// # Summary
/// 从 chart 响应中提取最新成交价。
///
/// # Logic
/// 1. 接口带回 error 或 result 为空，视为未知资产。
/// 2. 缺少 `regularMarketPrice` 同样视为未知资产。
/// 3. 非有限值或负值视为解析失败。
fn extract_price(asset: &str, response: YahooResponse) -> Result<Decimal, PriceError> {
    let raw = first_result(asset, response)?
        .meta
        .regular_market_price
        .ok_or_else(|| PriceError::UnknownAsset(asset.to_string()))?;
    to_price(asset, raw)
}

/// # Summary
/// 从 chart 响应中提取收盘价序列。
///
/// # Logic
/// 1. 按下标对齐 `timestamp` 与 `close`，收盘价为 null 的点跳过。
/// 2. 没有任何有效点时视为未知资产。
fn extract_history(asset: &str, response: YahooResponse) -> Result<Vec<PricePoint>, PriceError> {
    let result = first_result(asset, response)?;
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .map(|q| q.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.into_iter().zip(closes) {
        let (Some(raw), Some(time)) = (close, Utc.timestamp_opt(ts, 0).single()) else {
            continue;
        };
        points.push(PricePoint {
            time,
            close: to_price(asset, raw)?,
        });
    }

    if points.is_empty() {
        return Err(PriceError::UnknownAsset(asset.to_string()));
    }
    Ok(points)
}

#[async_trait]
impl PriceSource for YahooProvider {
    /// # Summary
    /// 查询资产的最新市价。
    ///
    /// # Logic
    /// 1. 请求 `chart/{asset}`，只取 1 天日线以减少负载。
    /// 2. 解析 JSON 并提取 `regularMarketPrice`。
    async fn current_price(&self, asset: &str) -> Result<Decimal, PriceError> {
        let json = self.fetch_chart(asset, "1d", "1d").await?;
        let price = extract_price(asset, json)?;
        debug!("Yahoo quote {} = {}", asset, price);
        Ok(price)
    }

    /// # Summary
    /// 按回看区间与采样周期抓取收盘价序列。
    async fn history(
        &self,
        asset: &str,
        period: HistoryPeriod,
        interval: HistoryInterval,
    ) -> Result<Vec<PricePoint>, PriceError> {
        let json = self
            .fetch_chart(asset, period.as_str(), interval.as_str())
            .await?;
        let points = extract_history(asset, json)?;
        debug!(
            "Yahoo history {} {}/{}: {} points",
            asset,
            period,
            interval,
            points.len()
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(body: &str) -> YahooResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_extract_regular_market_price() {
        let body = r#"{"chart":{"result":[{"meta":{"currency":"USD","symbol":"ADBE","regularMarketPrice":444.68,"chartPreviousClose":440.1},"timestamp":[1734705000]}],"error":null}}"#;
        assert_eq!(extract_price("ADBE", parse(body)).unwrap(), dec!(444.68));
    }

    #[test]
    fn test_price_is_rounded() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":1.0412345678}}],"error":null}}"#;
        assert_eq!(extract_price("EURUSD=X", parse(body)).unwrap(), dec!(1.041235));
    }

    #[test]
    fn test_chart_error_is_unknown_asset() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(matches!(
            extract_price("NOPE", parse(body)),
            Err(PriceError::UnknownAsset(ref a)) if a == "NOPE"
        ));
        assert!(matches!(
            extract_history("NOPE", parse(body)),
            Err(PriceError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_missing_price_is_unknown_asset() {
        let empty = r#"{"chart":{"result":[],"error":null}}"#;
        assert!(matches!(
            extract_price("X", parse(empty)),
            Err(PriceError::UnknownAsset(_))
        ));

        let no_meta_price = r#"{"chart":{"result":[{"meta":{"symbol":"X"}}],"error":null}}"#;
        assert!(matches!(
            extract_price("X", parse(no_meta_price)),
            Err(PriceError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_negative_price_is_parse_error() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":-1.5}}],"error":null}}"#;
        assert!(matches!(
            extract_price("X", parse(body)),
            Err(PriceError::Parse(_))
        ));
    }

    #[test]
    fn test_extract_history_skips_null_closes() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL","regularMarketPrice":250.1},
            "timestamp":[1735570800,1735657200,1735743600],
            "indicators":{"quote":[{"open":[251.0,null,249.0],"close":[252.2012345678,null,250.42]}],
            "adjclose":[{"adjclose":[252.2,null,250.42]}]}}],"error":null}}"#;
        let points = extract_history("AAPL", parse(body)).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, Utc.timestamp_opt(1735570800, 0).unwrap());
        assert_eq!(points[0].close, dec!(252.201235));
        assert_eq!(points[1].time, Utc.timestamp_opt(1735743600, 0).unwrap());
        assert_eq!(points[1].close, dec!(250.42));
    }

    #[test]
    fn test_history_without_points_is_unknown_asset() {
        let no_ts = r#"{"chart":{"result":[{"meta":{"symbol":"X"},"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        assert!(matches!(
            extract_history("X", parse(no_ts)),
            Err(PriceError::UnknownAsset(_))
        ));

        let all_null = r#"{"chart":{"result":[{"meta":{"symbol":"X"},"timestamp":[1735570800],"indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;
        assert!(matches!(
            extract_history("X", parse(all_null)),
            Err(PriceError::UnknownAsset(_))
        ));
    }

    #[test]
    fn test_chart_url_escapes_asset() {
        assert_eq!(
            chart_url("EURUSD=X").unwrap().as_str(),
            format!("{}/EURUSD=X", CHART_URL)
        );
        assert_eq!(
            chart_url("A/B?x#y").unwrap().as_str(),
            format!("{}/A%2FB%3Fx%23y", CHART_URL)
        );
    }
}
