// ==========================================
// 出口报价计算引擎 - 数量解析器
// ==========================================
// 职责: 吨/袋换算；确定最终 (吨数, 袋数)；整柜数量不足时自动改拼箱
// 输入: 运输方式、柜型、产品、单袋重量、数量提示
// 输出: ResolvedQuantity
// ==========================================

use crate::config::QuoteEngineConfig;
use crate::domain::quote::{QuantityHint, WarningKind};
use crate::domain::types::{ContainerType, QtyInputType, TransportMode};
use crate::engine::error::{EngineResult, QuoteError};
use crate::engine::rule_resolver::{resolve_or, Resolved, RuleResolver};
use crate::engine::warnings::WarningCollector;

/// 向上取整前扣除的浮点容差（避免 700.0000000001 被取成 701）
pub const CEIL_TOLERANCE: f64 = 1e-9;

/// 袋数上限（f64 可精确表示的最大整数 2^53）
pub const MAX_BAGS: f64 = 9_007_199_254_740_992.0;

/// 带容差的向上取整（结果不小于 +0.0，NaN 取 0）
pub fn ceil_tolerant(value: f64) -> f64 {
    let rounded = (value - CEIL_TOLERANCE).ceil();
    if rounded > 0.0 {
        rounded
    } else {
        0.0
    }
}

/// 件数取整: 任何正数至少 1 件
pub fn ceil_count(value: f64) -> f64 {
    if value > 0.0 {
        ceil_tolerant(value).max(1.0)
    } else {
        0.0
    }
}

/// 每吨袋数 = 1000 / 单袋重量
pub fn bags_per_ton(unit_weight_kg: f64) -> f64 {
    1000.0 / unit_weight_kg
}

pub fn tons_to_bags(tons: f64, unit_weight_kg: f64) -> f64 {
    tons * bags_per_ton(unit_weight_kg)
}

pub fn bags_to_tons(bags: f64, unit_weight_kg: f64) -> f64 {
    bags * unit_weight_kg / 1000.0
}

/// 单袋重量校验（必须为有限正数）
pub fn validate_unit_weight(unit_weight_kg: f64) -> EngineResult<f64> {
    if unit_weight_kg.is_finite() && unit_weight_kg > 0.0 {
        Ok(unit_weight_kg)
    } else {
        Err(QuoteError::InvalidUnitWeight(unit_weight_kg))
    }
}

/// 数量解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuantity {
    pub mode: TransportMode,
    pub auto_switched_to_lcl: bool,
    pub max_tons: Resolved<f64>,
    pub tons: f64,
    pub bags: u64,
}

// ==========================================
// QuantityResolver - 数量解析器
// ==========================================
pub struct QuantityResolver<'a> {
    rules: &'a RuleResolver<'a>,
    config: &'a QuoteEngineConfig,
}

impl<'a> QuantityResolver<'a> {
    pub fn new(rules: &'a RuleResolver<'a>, config: &'a QuoteEngineConfig) -> Self {
        Self { rules, config }
    }

    /// 解析最终数量
    ///
    /// 规则（顺序执行）:
    /// 1) 查装柜上限 max_tons，未配置取默认值并提示
    /// 2) 数量提示统一折算为吨
    /// 3) 请求整柜但提示吨数 < max_tons → 改拼箱并提示
    /// 4) 整柜: tons = max_tons, bags = ceil(tons × 每吨袋数)
    ///    拼箱: 必须有正数提示；按袋 bags = ceil(提示)，按吨 bags = ceil(tons × 每吨袋数)
    /// 5) tons、bags 必须为正
    pub fn resolve(
        &self,
        requested_mode: TransportMode,
        container_type: ContainerType,
        product_id: &str,
        unit_weight_kg: f64,
        hint: Option<QuantityHint>,
        warnings: &mut WarningCollector,
    ) -> EngineResult<ResolvedQuantity> {
        let unit_weight_kg = validate_unit_weight(unit_weight_kg)?;

        // 1. 装柜上限
        let max_tons = resolve_or(
            self.rules
                .container_load(product_id, container_type)
                .map(|r| r.max_tons),
            || self.config.default_container_max_tons,
        );
        if max_tons.is_fallback() {
            warnings.push(
                WarningKind::ContainerLoadRuleMissing,
                format!(
                    "未配置装柜上限: product_id={}, container_type={}，按 {} 吨计算",
                    product_id, container_type, max_tons.value
                ),
            );
        }

        // 2. 提示折算为吨（非正数提示视为未填写）
        let hint = hint.filter(QuantityHint::is_positive);
        let hint_tons = hint.map(|h| match h.input_type {
            QtyInputType::Tons => h.value,
            QtyInputType::Bags => bags_to_tons(h.value, unit_weight_kg),
        });

        // 3. 整柜数量不足 → 自动改拼箱
        let mut mode = requested_mode;
        let mut auto_switched_to_lcl = false;
        if let (TransportMode::Fcl, Some(tons)) = (requested_mode, hint_tons) {
            if tons < max_tons.value {
                mode = TransportMode::Lcl;
                auto_switched_to_lcl = true;
                warnings.push(
                    WarningKind::AutoSwitchedToLcl,
                    format!(
                        "数量 {:.3} 吨不足 {} 整柜上限 {} 吨，已自动切换为拼箱(LCL)",
                        tons, container_type, max_tons.value
                    ),
                );
            }
        }

        // 4. 最终数量
        let (tons, bags) = match mode {
            TransportMode::Fcl => {
                let tons = max_tons.value;
                (tons, ceil_count(tons_to_bags(tons, unit_weight_kg)))
            }
            TransportMode::Lcl => {
                let hint = hint.ok_or(QuoteError::MissingLclQuantity)?;
                match hint.input_type {
                    QtyInputType::Bags => {
                        let bags = ceil_count(hint.value);
                        (bags_to_tons(bags, unit_weight_kg), bags)
                    }
                    QtyInputType::Tons => {
                        (hint.value, ceil_count(tons_to_bags(hint.value, unit_weight_kg)))
                    }
                }
            }
        };

        // 5. 校验（袋数超出可精确表示范围同样拒绝）
        if !(tons.is_finite() && tons > 0.0) || !(1.0..=MAX_BAGS).contains(&bags) {
            return Err(QuoteError::InvalidResolvedQuantity { tons, bags });
        }
        let bags = bags as u64;

        tracing::debug!(
            mode = %mode,
            tons,
            bags,
            max_tons = max_tons.value,
            "数量解析完成"
        );

        Ok(ResolvedQuantity {
            mode,
            auto_switched_to_lcl,
            max_tons,
            tons,
            bags,
        })
    }
}
