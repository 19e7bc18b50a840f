// ==========================================
// 出口报价计算引擎 - 领域模型层
// ==========================================
// 职责: 定义参考数据实体、报价请求/结果、枚举类型
// 红线: 不含计算逻辑
// ==========================================

pub mod quote;
pub mod reference;
pub mod types;

// 重导出核心类型
pub use quote::{
    PackagingOverrides, QuantityHint, QuoteBreakdown, QuoteRequest, QuoteResult, QuoteSummary,
    QuoteWarning, WarningKind,
};
pub use reference::{
    ContainerLoadRule, Factory, FactoryPackagingOverride, FactoryProductCost, LandFreightRule,
    PackagingOption, Port, PortChargesRule, Product, ReferenceSnapshot,
};
pub use types::{
    ContainerType, LandFeeSource, PriceSource, QtyInputType, ResolutionSource, TransportMode,
};
