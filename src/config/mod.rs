// ==========================================
// 出口报价计算引擎 - 配置层
// ==========================================
// 职责: 兜底常量与提示开关
// ==========================================

pub mod engine_config;

pub use engine_config::QuoteEngineConfig;
