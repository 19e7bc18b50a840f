// ==========================================
// 出口报价计算引擎 - 成本汇总器
// ==========================================
// 职责: 出厂成本 + 包材 + 纸箱 + 内陆运费 + 港杂 → 每袋成本明细
// 包材单价优先级: 本次手填(custom) > 工厂覆写(override) > 包装方案默认(default)
// 红线: 各分项成本非负；净成本可因退税率过大为负（不拦截）
// ==========================================

use crate::config::QuoteEngineConfig;
use crate::domain::quote::{PackagingOverrides, WarningKind};
use crate::domain::reference::{
    FactoryPackagingOverride, LandFreightRule, PackagingOption, Product,
};
use crate::domain::types::{ContainerType, LandFeeSource, PriceSource, TransportMode};
use crate::engine::quantity::{ceil_tolerant, ResolvedQuantity};
use crate::engine::rule_resolver::{resolve_or, Resolved, RuleResolver};
use crate::engine::warnings::WarningCollector;

/// 有限非负，否则取 0
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// ==========================================
// 包装解析
// ==========================================

/// 带来源的包材单价
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    pub value: f64,
    pub source: PriceSource,
}

/// 合并手填/工厂覆写/默认值后的包装参数
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPackaging {
    pub unit_weight_kg: f64,
    /// 仅保留正数；None 表示散袋
    pub units_per_carton: Option<u32>,
    pub inner_pack_type: Option<String>,
    pub bag_price: ResolvedPrice,
    pub carton_price: ResolvedPrice,
}

fn pick_price(custom: Option<f64>, factory: Option<f64>, default: f64) -> ResolvedPrice {
    let usable = |v: &f64| v.is_finite();

    if let Some(value) = custom.filter(usable) {
        return ResolvedPrice {
            value: non_negative(value),
            source: PriceSource::Custom,
        };
    }

    if let Some(value) = factory.filter(usable) {
        return ResolvedPrice {
            value: non_negative(value),
            source: PriceSource::Override,
        };
    }

    ResolvedPrice {
        value: non_negative(default),
        source: PriceSource::Default,
    }
}

/// 解析包装参数
///
/// 单袋重量只做合并，合法性由调用方校验
pub fn resolve_packaging(
    option: &PackagingOption,
    factory_override: Option<&FactoryPackagingOverride>,
    overrides: &PackagingOverrides,
) -> ResolvedPackaging {
    let unit_weight_kg = overrides.unit_weight_kg.unwrap_or(option.unit_weight_kg);

    let units_per_carton = overrides
        .units_per_carton
        .unwrap_or(option.units_per_carton)
        .filter(|n| *n > 0);

    let inner_pack_type = overrides
        .inner_pack_type
        .clone()
        .or_else(|| option.inner_pack_type.clone());

    let bag_price = pick_price(
        overrides.bag_price_rmb,
        factory_override.and_then(|o| o.bag_price_rmb_override),
        option.bag_price_rmb,
    );
    let carton_price = pick_price(
        overrides.carton_price_rmb,
        factory_override.and_then(|o| o.carton_price_rmb_override),
        option.carton_price_rmb,
    );

    ResolvedPackaging {
        unit_weight_kg,
        units_per_carton,
        inner_pack_type,
        bag_price,
        carton_price,
    }
}

/// 箱数 = ceil(袋数 / 每箱袋数)；散袋为 0
pub fn carton_count(bags: u64, units_per_carton: Option<u32>) -> u64 {
    match units_per_carton {
        Some(n) if n > 0 => bags.div_ceil(u64::from(n)),
        _ => 0,
    }
}

/// LCL 港杂 = base + ceil(max(0, tons - 1)) × extra（首吨含在 base 内）
pub fn lcl_port_total(base_rmb: f64, extra_rmb_per_ton: f64, tons: f64) -> f64 {
    let extra_tons = ceil_tolerant((tons - 1.0).max(0.0));
    non_negative(base_rmb) + extra_tons * non_negative(extra_rmb_per_ton)
}

/// 手填内陆运费超出规则 [min, max] 时的提示文本；区间内返回 None
fn land_fee_range_message(rate: f64, rule: &LandFreightRule) -> Option<String> {
    let below = rule.min_rmb_per_ton.is_some_and(|min| rate < min);
    let above = rule.max_rmb_per_ton.is_some_and(|max| rate > max);
    if !(below || above) {
        return None;
    }

    let bound = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    Some(format!(
        "手填内陆运费 {} RMB/吨 超出规则区间 [{}, {}]",
        rate,
        bound(rule.min_rmb_per_ton),
        bound(rule.max_rmb_per_ton)
    ))
}

// ==========================================
// CostAggregator - 成本汇总器
// ==========================================

/// 成本汇总输入
#[derive(Debug, Clone)]
pub struct CostInputs<'a> {
    pub product: &'a Product,
    pub packaging: &'a ResolvedPackaging,
    pub factory_id: &'a str,
    pub port_id: Option<&'a str>,
    pub container_type: ContainerType,
    pub cost_rmb_per_ton: f64,
    pub quantity: &'a ResolvedQuantity,
    pub land_fee_override_rmb_per_ton: Option<f64>,
}

/// 成本明细（每袋 + 合计）
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub cartons: u64,
    pub invoice_tax_point: f64,
    pub refund_rate: f64,

    pub raw_rmb_per_bag: f64,
    pub bag_mat_rmb_per_bag: f64,
    pub carton_rmb_per_bag: f64,

    pub land_rmb_per_ton: f64,
    pub land_fee_source: LandFeeSource,
    pub land_total_rmb: f64,
    pub land_rmb_per_bag: f64,

    pub fcl_port_total_rmb: Resolved<f64>,
    pub lcl_port_total_rmb: Resolved<f64>,
    pub port_total_rmb: f64,
    pub port_rmb_per_bag: f64,

    pub domestic_total_rmb_per_bag: f64,
    pub rebate_rmb_per_bag: f64,
    pub net_rmb_per_bag: f64,
}

pub struct CostAggregator<'a> {
    rules: &'a RuleResolver<'a>,
    config: &'a QuoteEngineConfig,
}

impl<'a> CostAggregator<'a> {
    pub fn new(rules: &'a RuleResolver<'a>, config: &'a QuoteEngineConfig) -> Self {
        Self { rules, config }
    }

    /// 汇总每袋成本
    ///
    /// - raw = 出厂价 × (1 + 开票加点) × 吨数 / 袋数
    /// - domestic = raw + 包材 + 纸箱 + 内陆运费 + 港杂
    /// - rebate = raw × 退税率
    /// - net = domestic - rebate
    pub fn aggregate(&self, inputs: &CostInputs<'_>, warnings: &mut WarningCollector) -> CostBreakdown {
        let quantity = inputs.quantity;
        let tons = quantity.tons;
        let bags = quantity.bags as f64;

        // 出厂成本
        let invoice_tax_point = non_negative(inputs.product.invoice_tax_point);
        let raw_rmb_per_bag =
            inputs.cost_rmb_per_ton * (1.0 + invoice_tax_point) * tons / bags;

        // 包材 / 纸箱
        let bag_mat_rmb_per_bag = inputs.packaging.bag_price.value;
        let cartons = carton_count(quantity.bags, inputs.packaging.units_per_carton);
        let carton_rmb_per_bag = if cartons > 0 {
            cartons as f64 * inputs.packaging.carton_price.value / bags
        } else {
            0.0
        };

        // 内陆运费
        let (land_rmb_per_ton, land_fee_source) = self.resolve_land_fee(inputs, warnings);
        let land_total_rmb = land_rmb_per_ton * tons;
        let land_rmb_per_bag = land_total_rmb / bags;

        // 港杂（整柜/拼箱两种口径都计算）
        let fcl_port_total_rmb = self.fcl_port_total(inputs, warnings);
        let lcl_port_total_rmb = self.lcl_port_total(inputs, tons, warnings);
        let port_total_rmb = match quantity.mode {
            TransportMode::Fcl => fcl_port_total_rmb.value,
            TransportMode::Lcl => lcl_port_total_rmb.value,
        };
        if quantity.mode == TransportMode::Lcl
            && self.config.lcl_vs_fcl_advisory
            && lcl_port_total_rmb.value > fcl_port_total_rmb.value
        {
            warnings.push(
                WarningKind::LclCostlierThanFcl,
                format!(
                    "拼箱港杂 {:.2} RMB 高于 {} 整柜港杂 {:.2} RMB，建议改走整柜",
                    lcl_port_total_rmb.value, inputs.container_type, fcl_port_total_rmb.value
                ),
            );
        }
        let port_rmb_per_bag = port_total_rmb / bags;

        // 合计 / 退税 / 净成本
        let domestic_total_rmb_per_bag = raw_rmb_per_bag
            + bag_mat_rmb_per_bag
            + carton_rmb_per_bag
            + land_rmb_per_bag
            + port_rmb_per_bag;
        let refund_rate = if inputs.product.refund_rate.is_finite() {
            inputs.product.refund_rate
        } else {
            0.0
        };
        let rebate_rmb_per_bag = raw_rmb_per_bag * refund_rate;
        let net_rmb_per_bag = domestic_total_rmb_per_bag - rebate_rmb_per_bag;

        tracing::debug!(
            raw_rmb_per_bag,
            domestic_total_rmb_per_bag,
            net_rmb_per_bag,
            "成本汇总完成"
        );

        CostBreakdown {
            cartons,
            invoice_tax_point,
            refund_rate,
            raw_rmb_per_bag,
            bag_mat_rmb_per_bag,
            carton_rmb_per_bag,
            land_rmb_per_ton,
            land_fee_source,
            land_total_rmb,
            land_rmb_per_bag,
            fcl_port_total_rmb,
            lcl_port_total_rmb,
            port_total_rmb,
            port_rmb_per_bag,
            domestic_total_rmb_per_bag,
            rebate_rmb_per_bag,
            net_rmb_per_bag,
        }
    }

    /// 内陆运费单价：有效手填 > 规则默认值 > 0
    fn resolve_land_fee(
        &self,
        inputs: &CostInputs<'_>,
        warnings: &mut WarningCollector,
    ) -> (f64, LandFeeSource) {
        let mode = inputs.quantity.mode;
        let rule = self
            .rules
            .land_freight(mode, inputs.container_type, inputs.factory_id);

        match inputs.land_fee_override_rmb_per_ton {
            Some(rate) if rate.is_finite() && rate >= 0.0 => {
                let outside = rule
                    .filter(|_| self.config.land_fee_range_advisory)
                    .and_then(|r| land_fee_range_message(rate, r));
                if let Some(message) = outside {
                    warnings.push(WarningKind::LandFeeOutsideRange, message);
                }
                return (rate, LandFeeSource::Override);
            }
            Some(rate) => {
                warnings.push(
                    WarningKind::LandFeeOverrideIgnored,
                    format!("手填内陆运费无效 ({})，已忽略", rate),
                );
            }
            None => {}
        }

        let resolved = resolve_or(rule.map(|r| non_negative(r.default_rmb_per_ton)), || 0.0);
        if resolved.is_fallback() {
            warnings.push(
                WarningKind::LandFreightRuleMissing,
                format!(
                    "未配置内陆运费规则: mode={}, container_type={}, factory_id={}，按 0 计",
                    mode, inputs.container_type, inputs.factory_id
                ),
            );
            (resolved.value, LandFeeSource::Fallback)
        } else {
            (resolved.value, LandFeeSource::Table)
        }
    }

    /// 整柜港杂（按柜）
    fn fcl_port_total(&self, inputs: &CostInputs<'_>, warnings: &mut WarningCollector) -> Resolved<f64> {
        let resolved = resolve_or(
            self.rules
                .port_charges(TransportMode::Fcl, inputs.container_type, inputs.port_id)
                .map(|r| non_negative(r.base_rmb)),
            || self.config.fcl_port_fallback_rmb(inputs.container_type),
        );
        if resolved.is_fallback() {
            warnings.push(
                WarningKind::FclPortRuleMissing,
                format!(
                    "未配置整柜港杂规则: container_type={}, port_id={}，按默认 {} RMB 计",
                    inputs.container_type,
                    inputs.port_id.unwrap_or("-"),
                    resolved.value
                ),
            );
        }
        resolved
    }

    /// 拼箱港杂（首吨含在 base 内）
    fn lcl_port_total(
        &self,
        inputs: &CostInputs<'_>,
        tons: f64,
        warnings: &mut WarningCollector,
    ) -> Resolved<f64> {
        let resolved = resolve_or(
            self.rules
                .port_charges(TransportMode::Lcl, inputs.container_type, inputs.port_id)
                .map(|r| lcl_port_total(r.base_rmb, r.extra_rmb_per_ton, tons)),
            || 0.0,
        );
        if resolved.is_fallback() {
            warnings.push(
                WarningKind::LclPortRuleMissing,
                format!(
                    "未配置拼箱港杂规则: container_type={}, port_id={}，按 0 计",
                    inputs.container_type,
                    inputs.port_id.unwrap_or("-")
                ),
            );
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reference::{PortChargesRule, ReferenceSnapshot};

    fn option() -> PackagingOption {
        PackagingOption {
            id: "PK1".to_string(),
            product_id: "P1".to_string(),
            unit_weight_kg: 25.0,
            units_per_carton: Some(20),
            carton_price_rmb: 4.0,
            bag_price_rmb: 0.8,
            inner_pack_type: Some("PE".to_string()),
        }
    }

    fn product() -> Product {
        Product {
            id: "P1".to_string(),
            name: "PVC".to_string(),
            refund_rate: 0.09,
            purchase_vat_rate: 0.13,
            invoice_tax_point: 0.03,
            pol_port_id: Some("QINGDAO".to_string()),
        }
    }

    fn quantity(mode: TransportMode, tons: f64, bags: u64) -> ResolvedQuantity {
        ResolvedQuantity {
            mode,
            auto_switched_to_lcl: false,
            max_tons: Resolved::table(17.5),
            tons,
            bags,
        }
    }

    fn aggregate(
        snapshot: &ReferenceSnapshot,
        packaging: &ResolvedPackaging,
        quantity: &ResolvedQuantity,
        land_fee_override: Option<f64>,
    ) -> (CostBreakdown, WarningCollector) {
        let config = QuoteEngineConfig::default();
        let rules = RuleResolver::new(snapshot);
        let aggregator = CostAggregator::new(&rules, &config);
        let product = product();
        let inputs = CostInputs {
            product: &product,
            packaging,
            factory_id: "F1",
            port_id: Some("QINGDAO"),
            container_type: ContainerType::Gp20,
            cost_rmb_per_ton: 3000.0,
            quantity,
            land_fee_override_rmb_per_ton: land_fee_override,
        };
        let mut warnings = WarningCollector::new();
        let breakdown = aggregator.aggregate(&inputs, &mut warnings);
        (breakdown, warnings)
    }

    #[test]
    fn test_price_precedence_custom_over_factory_over_default() {
        let factory = FactoryPackagingOverride {
            factory_id: "F1".to_string(),
            packaging_option_id: "PK1".to_string(),
            carton_price_rmb_override: None,
            bag_price_rmb_override: Some(0.5),
        };

        let resolved = resolve_packaging(&option(), Some(&factory), &PackagingOverrides::default());
        assert_eq!(resolved.bag_price.value, 0.5);
        assert_eq!(resolved.bag_price.source, PriceSource::Override);
        assert_eq!(resolved.carton_price.value, 4.0);
        assert_eq!(resolved.carton_price.source, PriceSource::Default);

        let custom = PackagingOverrides {
            bag_price_rmb: Some(0.0),
            ..Default::default()
        };
        let resolved = resolve_packaging(&option(), Some(&factory), &custom);
        assert_eq!(resolved.bag_price.value, 0.0);
        assert_eq!(resolved.bag_price.source, PriceSource::Custom);
    }

    #[test]
    fn test_negative_prices_are_clamped() {
        let custom = PackagingOverrides {
            carton_price_rmb: Some(-2.0),
            ..Default::default()
        };
        let resolved = resolve_packaging(&option(), None, &custom);
        assert_eq!(resolved.carton_price.value, 0.0);
        assert_eq!(resolved.carton_price.source, PriceSource::Custom);
    }

    #[test]
    fn test_units_per_carton_override_tri_state() {
        let loose = PackagingOverrides {
            units_per_carton: Some(None),
            ..Default::default()
        };
        assert_eq!(resolve_packaging(&option(), None, &loose).units_per_carton, None);

        let zero = PackagingOverrides {
            units_per_carton: Some(Some(0)),
            ..Default::default()
        };
        assert_eq!(resolve_packaging(&option(), None, &zero).units_per_carton, None);

        let absent = PackagingOverrides::default();
        assert_eq!(resolve_packaging(&option(), None, &absent).units_per_carton, Some(20));
    }

    #[test]
    fn test_carton_count() {
        assert_eq!(carton_count(700, Some(20)), 35);
        assert_eq!(carton_count(701, Some(20)), 36);
        assert_eq!(carton_count(701, None), 0);
        assert_eq!(carton_count(701, Some(0)), 0);
    }

    #[test]
    fn test_lcl_port_total_first_ton_included() {
        assert_eq!(lcl_port_total(300.0, 80.0, 0.4), 300.0);
        assert_eq!(lcl_port_total(300.0, 80.0, 1.0), 300.0);
        assert_eq!(lcl_port_total(300.0, 80.0, 1.2), 380.0);
        assert_eq!(lcl_port_total(300.0, 80.0, 5.0), 620.0);
    }

    #[test]
    fn test_breakdown_without_rules() {
        let snapshot = ReferenceSnapshot::default();
        let packaging = resolve_packaging(&option(), None, &PackagingOverrides::default());
        let q = quantity(TransportMode::Fcl, 17.5, 700);

        let (b, warnings) = aggregate(&snapshot, &packaging, &q, None);

        let expected_raw = 3000.0 * 1.03 * 17.5 / 700.0;
        assert!((b.raw_rmb_per_bag - expected_raw).abs() < 1e-9);
        assert_eq!(b.bag_mat_rmb_per_bag, 0.8);
        assert_eq!(b.cartons, 35);
        assert!((b.carton_rmb_per_bag - 35.0 * 4.0 / 700.0).abs() < 1e-12);
        assert_eq!(b.land_rmb_per_bag, 0.0);
        assert_eq!(b.land_fee_source, LandFeeSource::Fallback);
        assert_eq!(b.port_total_rmb, 3500.0);
        assert!(b.fcl_port_total_rmb.is_fallback());
        assert!((b.rebate_rmb_per_bag - expected_raw * 0.09).abs() < 1e-9);
        assert!(
            (b.net_rmb_per_bag - (b.domestic_total_rmb_per_bag - b.rebate_rmb_per_bag)).abs()
                < 1e-12
        );

        assert_eq!(warnings.len(), 3);
        assert!(warnings.contains(WarningKind::LandFreightRuleMissing));
        assert!(warnings.contains(WarningKind::FclPortRuleMissing));
        assert!(warnings.contains(WarningKind::LclPortRuleMissing));
    }

    #[test]
    fn test_land_fee_override_wins_and_checks_range() {
        let snapshot = ReferenceSnapshot {
            land_freight_rules: vec![LandFreightRule {
                id: None,
                mode: TransportMode::Fcl,
                container_type: Some(ContainerType::Gp20),
                factory_id: None,
                min_rmb_per_ton: Some(50.0),
                max_rmb_per_ton: Some(120.0),
                default_rmb_per_ton: 80.0,
            }],
            ..Default::default()
        };
        let packaging = resolve_packaging(&option(), None, &PackagingOverrides::default());
        let q = quantity(TransportMode::Fcl, 17.5, 700);

        let (b, warnings) = aggregate(&snapshot, &packaging, &q, None);
        assert_eq!(b.land_rmb_per_ton, 80.0);
        assert_eq!(b.land_fee_source, LandFeeSource::Table);
        assert!(!warnings.contains(WarningKind::LandFreightRuleMissing));

        let (b, warnings) = aggregate(&snapshot, &packaging, &q, Some(150.0));
        assert_eq!(b.land_rmb_per_ton, 150.0);
        assert_eq!(b.land_fee_source, LandFeeSource::Override);
        assert!((b.land_total_rmb - 150.0 * 17.5).abs() < 1e-9);
        assert!(warnings.contains(WarningKind::LandFeeOutsideRange));

        let (b, warnings) = aggregate(&snapshot, &packaging, &q, Some(-1.0));
        assert_eq!(b.land_rmb_per_ton, 80.0);
        assert!(warnings.contains(WarningKind::LandFeeOverrideIgnored));
    }

    #[test]
    fn test_lcl_costlier_than_fcl_advisory() {
        let snapshot = ReferenceSnapshot {
            port_charges_rules: vec![
                PortChargesRule {
                    id: None,
                    mode: TransportMode::Fcl,
                    container_type: Some(ContainerType::Gp20),
                    port_id: None,
                    base_rmb: 1000.0,
                    extra_rmb_per_ton: 0.0,
                },
                PortChargesRule {
                    id: None,
                    mode: TransportMode::Lcl,
                    container_type: Some(ContainerType::Gp20),
                    port_id: Some("QINGDAO".to_string()),
                    base_rmb: 300.0,
                    extra_rmb_per_ton: 150.0,
                },
            ],
            ..Default::default()
        };
        let packaging = resolve_packaging(&option(), None, &PackagingOverrides::default());
        let q = quantity(TransportMode::Lcl, 10.0, 400);

        let (b, warnings) = aggregate(&snapshot, &packaging, &q, Some(0.0));
        assert_eq!(b.lcl_port_total_rmb.value, 300.0 + 9.0 * 150.0);
        assert_eq!(b.fcl_port_total_rmb.value, 1000.0);
        assert_eq!(b.port_total_rmb, b.lcl_port_total_rmb.value);
        assert!(warnings.contains(WarningKind::LclCostlierThanFcl));
        assert!(!warnings.contains(WarningKind::FclPortRuleMissing));
    }

    #[test]
    fn test_land_fee_range_message_marks_open_bounds() {
        let rule = LandFreightRule {
            id: None,
            mode: TransportMode::Fcl,
            container_type: None,
            factory_id: None,
            min_rmb_per_ton: Some(30.0),
            max_rmb_per_ton: None,
            default_rmb_per_ton: 40.0,
        };

        assert!(land_fee_range_message(30.0, &rule).is_none());
        assert!(land_fee_range_message(500.0, &rule).is_none());
        let msg = land_fee_range_message(10.0, &rule).unwrap();
        assert!(msg.contains("[30, -]"));
    }
}
