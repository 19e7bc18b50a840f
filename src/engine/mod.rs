// ==========================================
// 出口报价计算引擎 - 引擎层
// ==========================================
// 职责: 规则解析、数量解析、成本汇总、售价合成、结果组装
// 红线: 引擎不做 I/O，所有降级都必须输出提示
// ==========================================

pub mod cost;
pub mod error;
pub mod pricing;
pub mod quantity;
pub mod quote_engine;
pub mod rule_resolver;
pub mod warnings;

// 重导出核心引擎
pub use cost::{CostAggregator, CostBreakdown, CostInputs, ResolvedPackaging, ResolvedPrice};
pub use error::{EngineResult, QuoteError};
pub use pricing::{PriceQuote, PriceSynthesizer};
pub use quantity::{QuantityResolver, ResolvedQuantity};
pub use quote_engine::{calculate_quote, QuoteEngine};
pub use rule_resolver::{find_scoped_rule, resolve_or, Resolved, RuleResolver, ScopedRule};
pub use warnings::WarningCollector;
