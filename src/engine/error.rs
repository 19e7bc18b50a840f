// ==========================================
// 出口报价计算引擎 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 致命错误只用于"请求不成立"，数据缺失一律走降级提示
// ==========================================

use thiserror::Error;

/// 报价计算致命错误
///
/// 出现以下任一情况时引擎拒绝计算，不做猜测
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    // ===== 引用缺失 =====
    #[error("产品不存在: product_id={0}")]
    ProductNotFound(String),

    #[error("包装方案不存在: packaging_option_id={0}")]
    PackagingOptionNotFound(String),

    #[error("工厂不存在: factory_id={0}")]
    FactoryNotFound(String),

    #[error("包装方案不属于所选产品: packaging_option_id={packaging_option_id}, product_id={product_id}")]
    PackagingProductMismatch {
        packaging_option_id: String,
        product_id: String,
    },

    #[error("未配置出厂成本: factory_id={factory_id}, product_id={product_id}")]
    FactoryCostMissing {
        factory_id: String,
        product_id: String,
    },

    #[error("出厂成本必须大于 0: factory_id={factory_id}, product_id={product_id}, cost_rmb_per_ton={cost_rmb_per_ton}")]
    FactoryCostNonPositive {
        factory_id: String,
        product_id: String,
        cost_rmb_per_ton: f64,
    },

    // ===== 交易参数 =====
    #[error("汇率必须大于 0: fx_rate={0}")]
    InvalidFxRate(f64),

    #[error("毛利率必须在 [0, 1) 区间: margin_pct={0}")]
    InvalidMargin(f64),

    // ===== 数量 =====
    #[error("拼箱必须填写大于 0 的数量")]
    MissingLclQuantity,

    #[error("单袋重量必须大于 0: unit_weight_kg={0}")]
    InvalidUnitWeight(f64),

    #[error("数量换算结果无效: tons={tons}, bags={bags}")]
    InvalidResolvedQuantity { tons: f64, bags: f64 },
}

impl QuoteError {
    /// 稳定错误码（供界面阻断"计算"操作时展示具体原因）
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            QuoteError::PackagingOptionNotFound(_) => "PACKAGING_OPTION_NOT_FOUND",
            QuoteError::FactoryNotFound(_) => "FACTORY_NOT_FOUND",
            QuoteError::PackagingProductMismatch { .. } => "PACKAGING_PRODUCT_MISMATCH",
            QuoteError::FactoryCostMissing { .. } => "FACTORY_COST_MISSING",
            QuoteError::FactoryCostNonPositive { .. } => "FACTORY_COST_NON_POSITIVE",
            QuoteError::InvalidFxRate(_) => "INVALID_FX_RATE",
            QuoteError::InvalidMargin(_) => "INVALID_MARGIN",
            QuoteError::MissingLclQuantity => "MISSING_LCL_QUANTITY",
            QuoteError::InvalidUnitWeight(_) => "INVALID_UNIT_WEIGHT",
            QuoteError::InvalidResolvedQuantity { .. } => "INVALID_RESOLVED_QUANTITY",
        }
    }
}

/// 引擎统一返回类型
pub type EngineResult<T> = Result<T, QuoteError>;
