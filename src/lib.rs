// ==========================================
// 出口报价计算引擎 - 核心库
// ==========================================
// 定位: 落地成本 → 售价 → 毛利 的纯计算核心
// 输入: 参考数据快照 + 报价请求
// 输出: 报价结果（汇总 + 明细 + 降级提示）
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 报价计算
pub mod engine;

// 配置层 - 兜底常量
pub mod config;

// 导入层 - JSON 加载
pub mod importer;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::QuoteEngineConfig;
pub use domain::{
    ContainerType, PackagingOverrides, PriceSource, QtyInputType, QuantityHint, QuoteRequest,
    QuoteResult, QuoteWarning, ReferenceSnapshot, TransportMode, WarningKind,
};
pub use engine::{calculate_quote, QuoteEngine, QuoteError};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "出口报价计算引擎";
