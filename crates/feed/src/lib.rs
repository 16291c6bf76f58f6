//! 行情数据适配器：外部报价源到 `PriceSource` 端口的实现。

pub mod yahoo;
