use folio_core::market::entity::{HistoryInterval, HistoryPeriod};
use folio_core::market::error::PriceError;
use folio_core::market::port::PriceSource;
use folio_feed::yahoo::YahooProvider;
use rust_decimal::Decimal;

/// # Summary
/// 雅虎财经实时报价的集成测试，需要外网。
///
/// # Logic
/// 1. 初始化 YahooProvider。
/// 2. 查询 AAPL 当前价格。
/// 3. 断言价格为正。
#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_yahoo_real_quote() {
    let provider = YahooProvider::new().unwrap();

    let result = provider.current_price("AAPL").await;
    assert!(result.is_ok(), "Failed to fetch quote from Yahoo: {:?}", result.err());
    let price = result.unwrap();
    assert!(price > Decimal::ZERO);
    println!("AAPL = {}", price);
}

#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_yahoo_unknown_symbol() {
    let provider = YahooProvider::new().unwrap();

    let result = provider.current_price("NO_SUCH_TICKER_XYZ123").await;
    assert!(
        matches!(result, Err(PriceError::UnknownAsset(_))),
        "unexpected result: {:?}",
        result
    );
}

#[tokio::test]
#[ignore = "requires network access to Yahoo Finance"]
async fn test_yahoo_close_history() {
    let provider = YahooProvider::new().unwrap();

    let points = provider
        .history("MSFT", HistoryPeriod::Month1, HistoryInterval::Day1)
        .await
        .unwrap();
    assert!(points.len() > 10);
    assert!(points.windows(2).all(|w| w[0].time < w[1].time));
    assert!(points.iter().all(|p| p.close > Decimal::ZERO));
}

#[test]
fn test_provider_can_be_built_twice() {
    assert!(YahooProvider::new().is_ok());
    assert!(YahooProvider::new().is_ok());
}
