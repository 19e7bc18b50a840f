// ==========================================
// 出口报价计算引擎 - 报价请求与结果
// ==========================================
// 职责: 定义一次报价计算的输入契约 (QuoteRequest) 与输出契约 (QuoteResult)
// 红线: 结果对象是唯一返回值，不存在旁路输出
// ==========================================

use crate::domain::types::{
    ContainerType, LandFeeSource, PriceSource, QtyInputType, TransportMode,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ==========================================
// QuoteRequest - 报价请求
// ==========================================

/// 报价请求（调用方每次重算时构造）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub product_id: String,
    pub packaging_option_id: String,
    pub factory_id: String,
    pub mode: TransportMode,
    pub container_type: ContainerType,
    /// 汇率 (RMB / USD)，必须 > 0
    pub fx_rate: f64,
    /// 毛利率，取值 [0, 1)
    pub margin_pct: f64,
    /// 数量提示（LCL 必填）
    #[serde(default)]
    pub quantity: Option<QuantityHint>,
    /// 本次报价的包装字段手填覆写
    #[serde(default)]
    pub packaging_overrides: PackagingOverrides,
    /// 内陆运费手填 (RMB/吨)，优先于规则表
    #[serde(default)]
    pub land_fee_override_rmb_per_ton: Option<f64>,
}

/// 数量提示（按吨或按袋）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantityHint {
    #[serde(rename = "qty_input_type")]
    pub input_type: QtyInputType,
    #[serde(rename = "qty_input_value")]
    pub value: f64,
}

impl QuantityHint {
    pub fn tons(value: f64) -> Self {
        Self {
            input_type: QtyInputType::Tons,
            value,
        }
    }

    pub fn bags(value: f64) -> Self {
        Self {
            input_type: QtyInputType::Bags,
            value,
        }
    }

    /// 是否为可用的正数提示
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

/// 包装字段覆写
///
/// 所有字段缺省表示"沿用包装方案"；`units_per_carton` 为三态：
/// - 缺省: 沿用包装方案
/// - `Some(None)`: 显式改为散袋
/// - `Some(Some(n))`: 显式指定每箱袋数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingOverrides {
    #[serde(default)]
    pub unit_weight_kg: Option<f64>,
    #[serde(
        default,
        deserialize_with = "deserialize_explicit",
        skip_serializing_if = "Option::is_none"
    )]
    pub units_per_carton: Option<Option<u32>>,
    #[serde(default)]
    pub bag_price_rmb: Option<f64>,
    #[serde(default)]
    pub carton_price_rmb: Option<f64>,
    #[serde(default)]
    pub inner_pack_type: Option<String>,
}

/// 区分"字段缺省"与"显式 null"
fn deserialize_explicit<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ==========================================
// QuoteWarning - 降级提示
// ==========================================

/// 非致命提示类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// 未配置装柜上限，使用默认吨数
    ContainerLoadRuleMissing,
    /// 数量不足整柜，已自动切换为拼箱
    AutoSwitchedToLcl,
    /// 未配置内陆运费规则，按 0 计
    LandFreightRuleMissing,
    /// 内陆运费手填值无效，已忽略
    LandFeeOverrideIgnored,
    /// 内陆运费手填值超出规则区间
    LandFeeOutsideRange,
    /// 未配置整柜港杂规则，使用默认值
    FclPortRuleMissing,
    /// 未配置拼箱港杂规则，按 0 计
    LclPortRuleMissing,
    /// 拼箱港杂高于整柜，建议改走整柜
    LclCostlierThanFcl,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            WarningKind::ContainerLoadRuleMissing => "CONTAINER_LOAD_RULE_MISSING",
            WarningKind::AutoSwitchedToLcl => "AUTO_SWITCHED_TO_LCL",
            WarningKind::LandFreightRuleMissing => "LAND_FREIGHT_RULE_MISSING",
            WarningKind::LandFeeOverrideIgnored => "LAND_FEE_OVERRIDE_IGNORED",
            WarningKind::LandFeeOutsideRange => "LAND_FEE_OUTSIDE_RANGE",
            WarningKind::FclPortRuleMissing => "FCL_PORT_RULE_MISSING",
            WarningKind::LclPortRuleMissing => "LCL_PORT_RULE_MISSING",
            WarningKind::LclCostlierThanFcl => "LCL_COSTLIER_THAN_FCL",
        };
        write!(f, "{}", code)
    }
}

/// 降级提示（类别 + 可读说明）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl fmt::Display for QuoteWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// ==========================================
// QuoteResult - 报价结果
// ==========================================

/// 报价汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub product_id: String,
    pub packaging_option_id: String,
    pub factory_id: String,
    /// 实际采用的起运港（产品起运港 → 工厂默认港）
    pub pol_port_id: Option<String>,
    /// 起运港名称（港口表中未登记时为空）
    pub pol_port_name: Option<String>,

    // 运输方式
    pub requested_mode: TransportMode,
    pub mode: TransportMode,
    pub auto_switched_to_lcl: bool,
    pub container_type: ContainerType,

    // 数量
    pub tons: f64,
    pub bags: u64,
    pub cartons_int: u64,
    pub unit_weight_kg: f64,
    pub units_per_carton: Option<u32>,
    pub inner_pack_type: Option<String>,

    // 包材单价与来源
    pub bag_price_rmb: f64,
    pub bag_price_source: PriceSource,
    pub carton_price_rmb: f64,
    pub carton_price_source: PriceSource,

    // 内陆运费来源
    pub land_fee_source: LandFeeSource,

    // 港杂（两种口径都给出，便于比较）
    pub fcl_port_total_rmb: f64,
    pub lcl_port_total_rmb: f64,
    pub port_total_rmb: f64,

    // 价格
    pub fx_rate: f64,
    pub margin_pct: f64,
    pub cost_usd_per_bag: f64,
    pub sell_usd_per_bag: f64,
    pub sell_rmb_per_bag: f64,
    pub gp_rmb_per_bag: f64,

    // 合计
    pub net_rmb_total: f64,
    pub sell_rmb_total: f64,
    pub sell_usd_total: f64,
    pub gp_rmb_total: f64,
    pub gp_usd_total: f64,
}

/// 每袋成本明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub max_tons: f64,
    pub bags_per_ton: f64,
    pub cost_rmb_per_ton: f64,
    pub invoice_tax_point: f64,
    pub refund_rate: f64,

    pub raw_rmb_per_bag: f64,
    pub bag_mat_rmb_per_bag: f64,
    pub carton_rmb_per_bag: f64,
    pub land_rmb_per_ton: f64,
    pub land_total_rmb: f64,
    pub land_rmb_per_bag: f64,
    pub port_rmb_per_bag: f64,
    pub domestic_total_rmb_per_bag: f64,
    pub rebate_rmb_per_bag: f64,
    pub net_rmb_per_bag: f64,
}

/// 报价结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub summary: QuoteSummary,
    pub breakdown: QuoteBreakdown,
    pub warnings: Vec<QuoteWarning>,
}

impl QuoteResult {
    /// 是否包含某类提示
    pub fn has_warning(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}
