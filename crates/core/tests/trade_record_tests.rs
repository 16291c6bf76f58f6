use chrono::{TimeZone, Utc};
use folio_core::trade::entity::{
    Action, ActionType, Instrument, TradeFields, TradeRecord, TradeRow, TradeType,
};
use folio_core::trade::error::ValidationError;
use rust_decimal_macros::dec;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 2, 14, 30, 0).unwrap()
}

#[test]
fn test_rejects_invalid_input() {
    let empty = TradeRecord::new(TradeFields::stock("  ", t0(), dec!(1), dec!(10), ActionType::Buy));
    assert_eq!(empty.unwrap_err(), ValidationError::EmptyAsset);

    let zero_qty = TradeRecord::new(TradeFields::stock("AAPL", t0(), dec!(0), dec!(10), ActionType::Buy));
    assert_eq!(zero_qty.unwrap_err(), ValidationError::NonPositiveQuantity(dec!(0)));

    let neg_qty = TradeRecord::new(TradeFields::stock("AAPL", t0(), dec!(-3), dec!(10), ActionType::Sell));
    assert_eq!(neg_qty.unwrap_err(), ValidationError::NonPositiveQuantity(dec!(-3)));

    let neg_price = TradeRecord::new(TradeFields::stock("AAPL", t0(), dec!(1), dec!(-0.01), ActionType::Buy));
    assert_eq!(neg_price.unwrap_err(), ValidationError::NegativePrice(dec!(-0.01)));
}

#[test]
fn test_rejects_unrepresentable_notional() {
    let huge = TradeRecord::new(TradeFields::stock(
        "AAPL",
        t0(),
        dec!(10000000000000000000),
        dec!(100000000000),
        ActionType::Buy,
    ));
    assert_eq!(
        huge.unwrap_err(),
        ValidationError::OutOfRange {
            quantity: dec!(10000000000000000000),
            price: dec!(100000000000),
        }
    );

    // 数量大但价格为零时名义金额为零，仍然合法
    let free = TradeRecord::new(TradeFields::stock(
        "GIFT",
        t0(),
        dec!(10000000000000000000),
        dec!(0),
        ActionType::Buy,
    ))
    .unwrap();
    assert_eq!(free.notional(), dec!(0));
}

#[test]
fn test_zero_price_is_accepted() {
    let trade = TradeRecord::new(TradeFields::stock("GIFT", t0(), dec!(1), dec!(0), ActionType::Buy)).unwrap();
    assert_eq!(trade.price(), dec!(0));
}

#[test]
fn test_irrelevant_fields_are_silently_dropped() {
    // 股票买入却携带了融券日期、货币对和单位
    let fields = TradeFields::stock("AAPL", t0(), dec!(5), dec!(150), ActionType::Buy)
        .with_short_date(t0())
        .with_currency_pair("EUR", "USD")
        .with_unit("oz");
    let trade = TradeRecord::new(fields).unwrap();

    assert_eq!(trade.instrument(), &Instrument::Stock);
    assert_eq!(trade.action(), &Action::Buy);
    assert!(trade.short_date().is_none());
    assert!(trade.base_currency().is_none());
    assert!(trade.quote_currency().is_none());
    assert!(trade.unit().is_none());
}

#[test]
fn test_relevant_fields_are_kept() {
    let fx = TradeRecord::new(
        TradeFields::stock("EURUSD", t0(), dec!(1000), dec!(1.08), ActionType::Short)
            .with_trade_type(TradeType::Currency)
            .with_currency_pair("EUR", "USD")
            .with_short_date(t0())
            .with_unit("barrel"),
    )
    .unwrap();
    assert_eq!(fx.trade_type(), TradeType::Currency);
    assert_eq!(fx.action_type(), ActionType::Short);
    assert_eq!(fx.base_currency(), Some("EUR"));
    assert_eq!(fx.quote_currency(), Some("USD"));
    assert_eq!(fx.short_date(), Some(t0()));
    assert!(fx.unit().is_none());

    let gold = TradeRecord::new(
        TradeFields::stock("GC", t0(), dec!(2), dec!(2650.5), ActionType::Buy)
            .with_trade_type(TradeType::Commodity)
            .with_unit("oz")
            .with_currency_pair("XAU", "USD"),
    )
    .unwrap();
    assert_eq!(gold.unit(), Some("oz"));
    assert!(gold.base_currency().is_none());
}

#[test]
fn test_asset_is_trimmed() {
    let trade = TradeRecord::new(TradeFields::stock(" MSFT ", t0(), dec!(1), dec!(400), ActionType::Buy)).unwrap();
    assert_eq!(trade.asset(), "MSFT");
    assert_eq!(trade.notional(), dec!(400));
}

#[test]
fn test_row_uses_literal_keys() {
    let trade = TradeRecord::new(
        TradeFields::stock("TSLA", t0(), dec!(3), dec!(250), ActionType::Short).with_short_date(t0()),
    )
    .unwrap();
    let value = serde_json::to_value(trade.to_row()).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "Action",
            "Asset",
            "Base Currency",
            "Price",
            "Quantity",
            "Quote Currency",
            "Short Date",
            "Time",
            "Trade Type",
            "Unit",
        ]
    );
    assert_eq!(object["Action"], "Short");
    assert_eq!(object["Trade Type"], "Stock");
    assert!(object["Base Currency"].is_null());
    assert!(object["Unit"].is_null());
    assert!(!object["Short Date"].is_null());
}

#[test]
fn test_deserializing_a_row_revalidates() {
    let trade = TradeRecord::new(TradeFields::stock("NVDA", t0(), dec!(4), dec!(120.5), ActionType::Sell)).unwrap();
    let json = serde_json::to_string(&trade).unwrap();
    let back: TradeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, trade);

    let mut row: TradeRow = trade.to_row();
    row.quantity = dec!(0);
    let bad = serde_json::to_string(&row).unwrap();
    assert!(serde_json::from_str::<TradeRecord>(&bad).is_err());

    // 行里残留的无关字段在还原时被清洗
    let mut stale: TradeRow = trade.to_row();
    stale.unit = Some("oz".to_string());
    let cleaned = TradeRecord::try_from(stale).unwrap();
    assert!(cleaned.unit().is_none());
}

#[test]
fn test_display_mentions_type_specific_details() {
    let fx = TradeRecord::new(
        TradeFields::stock("EURUSD", t0(), dec!(100), dec!(1.1), ActionType::Buy)
            .with_trade_type(TradeType::Currency)
            .with_currency_pair("EUR", "USD"),
    )
    .unwrap();
    let text = fx.to_string();
    assert!(text.starts_with("Buy 100 units of EURUSD (Currency) at 1.1 on "));
    assert!(text.ends_with(", Currency Pair: EUR/USD"));

    let short = TradeRecord::new(TradeFields::stock("GME", t0(), dec!(7), dec!(20), ActionType::Short)).unwrap();
    assert!(short.to_string().ends_with(", Short Date: None"));
}

#[test]
fn test_enum_parsing_is_case_insensitive() {
    assert_eq!("buy".parse::<ActionType>().unwrap(), ActionType::Buy);
    assert_eq!("SHORT".parse::<ActionType>().unwrap(), ActionType::Short);
    assert_eq!("Commodity".parse::<TradeType>().unwrap(), TradeType::Commodity);
    assert_eq!(
        "hold".parse::<ActionType>().unwrap_err(),
        ValidationError::UnknownAction("hold".to_string())
    );
    assert_eq!(
        "bond".parse::<TradeType>().unwrap_err(),
        ValidationError::UnknownTradeType("bond".to_string())
    );
}
