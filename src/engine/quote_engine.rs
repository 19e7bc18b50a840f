// ==========================================
// 出口报价计算引擎 - 报价编排器
// ==========================================
// 用途: 协调 数量解析 → 成本汇总 → 售价合成 → 结果组装
// 红线: 纯函数；只读参考数据快照，不做 I/O，不保留跨调用状态
// ==========================================

use crate::config::QuoteEngineConfig;
use crate::domain::quote::{QuoteBreakdown, QuoteRequest, QuoteResult, QuoteSummary};
use crate::domain::reference::ReferenceSnapshot;
use crate::engine::cost::{resolve_packaging, CostAggregator, CostInputs};
use crate::engine::error::{EngineResult, QuoteError};
use crate::engine::pricing::{validate_fx_rate, validate_margin, PriceSynthesizer};
use crate::engine::quantity::{bags_per_ton, validate_unit_weight, QuantityResolver};
use crate::engine::rule_resolver::RuleResolver;
use crate::engine::warnings::WarningCollector;
use tracing::{debug, instrument};

// ==========================================
// QuoteEngine - 报价引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct QuoteEngine {
    config: QuoteEngineConfig,
}

impl QuoteEngine {
    pub fn new(config: QuoteEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QuoteEngineConfig {
        &self.config
    }

    /// 执行一次完整报价计算
    ///
    /// # 参数
    /// - snapshot: 参考数据快照（只读）
    /// - request: 报价请求
    ///
    /// # 返回
    /// - Ok(QuoteResult): 汇总 + 明细 + 降级提示
    /// - Err(QuoteError): 请求不成立（引用缺失、参数越界、数量无效）
    #[instrument(
        skip(self, snapshot, request),
        fields(
            product_id = %request.product_id,
            packaging_option_id = %request.packaging_option_id,
            factory_id = %request.factory_id,
            mode = %request.mode,
            container_type = %request.container_type
        )
    )]
    pub fn calculate(
        &self,
        snapshot: &ReferenceSnapshot,
        request: &QuoteRequest,
    ) -> EngineResult<QuoteResult> {
        let mut warnings = WarningCollector::new();
        let rules = RuleResolver::new(snapshot);

        // ==========================================
        // 步骤0: 引用解析与参数校验
        // ==========================================
        debug!("步骤0: 解析产品/包装/工厂并校验交易参数");

        let product = snapshot
            .find_product(&request.product_id)
            .ok_or_else(|| QuoteError::ProductNotFound(request.product_id.clone()))?;
        let option = snapshot
            .find_packaging_option(&request.packaging_option_id)
            .ok_or_else(|| {
                QuoteError::PackagingOptionNotFound(request.packaging_option_id.clone())
            })?;
        let factory = snapshot
            .find_factory(&request.factory_id)
            .ok_or_else(|| QuoteError::FactoryNotFound(request.factory_id.clone()))?;

        if option.product_id != product.id {
            return Err(QuoteError::PackagingProductMismatch {
                packaging_option_id: option.id.clone(),
                product_id: product.id.clone(),
            });
        }

        let fx_rate = validate_fx_rate(request.fx_rate)?;
        let margin_pct = validate_margin(request.margin_pct)?;

        // 包装: 手填 > 工厂覆写 > 默认
        let factory_override = rules.packaging_override(&factory.id, &option.id);
        let packaging = resolve_packaging(option, factory_override, &request.packaging_overrides);
        let unit_weight_kg = validate_unit_weight(packaging.unit_weight_kg)?;

        let cost_rmb_per_ton = snapshot
            .find_factory_cost(&factory.id, &product.id)
            .ok_or_else(|| QuoteError::FactoryCostMissing {
                factory_id: factory.id.clone(),
                product_id: product.id.clone(),
            })?
            .cost_rmb_per_ton;
        if !(cost_rmb_per_ton.is_finite() && cost_rmb_per_ton > 0.0) {
            return Err(QuoteError::FactoryCostNonPositive {
                factory_id: factory.id.clone(),
                product_id: product.id.clone(),
                cost_rmb_per_ton,
            });
        }

        // 起运港: 产品 → 工厂默认
        let pol_port_id = product
            .pol_port_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| {
                factory
                    .default_port_id
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
            });

        // ==========================================
        // 步骤1: 数量解析（可能自动改拼箱）
        // ==========================================
        debug!("步骤1: 数量解析");
        let quantity = QuantityResolver::new(&rules, &self.config).resolve(
            request.mode,
            request.container_type,
            &product.id,
            unit_weight_kg,
            request.quantity,
            &mut warnings,
        )?;

        // ==========================================
        // 步骤2: 成本汇总
        // ==========================================
        debug!("步骤2: 成本汇总");
        let inputs = CostInputs {
            product,
            packaging: &packaging,
            factory_id: &factory.id,
            port_id: pol_port_id,
            container_type: request.container_type,
            cost_rmb_per_ton,
            quantity: &quantity,
            land_fee_override_rmb_per_ton: request.land_fee_override_rmb_per_ton,
        };
        let cost = CostAggregator::new(&rules, &self.config).aggregate(&inputs, &mut warnings);

        // ==========================================
        // 步骤3: 售价合成
        // ==========================================
        debug!("步骤3: 售价合成");
        let price = PriceSynthesizer::new().synthesize(
            cost.net_rmb_per_bag,
            quantity.bags,
            fx_rate,
            margin_pct,
        )?;

        // ==========================================
        // 步骤4: 结果组装
        // ==========================================
        let summary = QuoteSummary {
            product_id: product.id.clone(),
            packaging_option_id: option.id.clone(),
            factory_id: factory.id.clone(),
            pol_port_id: pol_port_id.map(str::to_string),
            pol_port_name: pol_port_id
                .and_then(|id| snapshot.find_port(id))
                .map(|port| port.name.clone()),
            requested_mode: request.mode,
            mode: quantity.mode,
            auto_switched_to_lcl: quantity.auto_switched_to_lcl,
            container_type: request.container_type,
            tons: quantity.tons,
            bags: quantity.bags,
            cartons_int: cost.cartons,
            unit_weight_kg,
            units_per_carton: packaging.units_per_carton,
            inner_pack_type: packaging.inner_pack_type.clone(),
            bag_price_rmb: packaging.bag_price.value,
            bag_price_source: packaging.bag_price.source,
            carton_price_rmb: packaging.carton_price.value,
            carton_price_source: packaging.carton_price.source,
            land_fee_source: cost.land_fee_source,
            fcl_port_total_rmb: cost.fcl_port_total_rmb.value,
            lcl_port_total_rmb: cost.lcl_port_total_rmb.value,
            port_total_rmb: cost.port_total_rmb,
            fx_rate,
            margin_pct,
            cost_usd_per_bag: price.cost_usd_per_bag,
            sell_usd_per_bag: price.sell_usd_per_bag,
            sell_rmb_per_bag: price.sell_rmb_per_bag,
            gp_rmb_per_bag: price.gp_rmb_per_bag,
            net_rmb_total: price.net_rmb_total,
            sell_rmb_total: price.sell_rmb_total,
            sell_usd_total: price.sell_usd_total,
            gp_rmb_total: price.gp_rmb_total,
            gp_usd_total: price.gp_usd_total,
        };

        let breakdown = QuoteBreakdown {
            max_tons: quantity.max_tons.value,
            bags_per_ton: bags_per_ton(unit_weight_kg),
            cost_rmb_per_ton,
            invoice_tax_point: cost.invoice_tax_point,
            refund_rate: cost.refund_rate,
            raw_rmb_per_bag: cost.raw_rmb_per_bag,
            bag_mat_rmb_per_bag: cost.bag_mat_rmb_per_bag,
            carton_rmb_per_bag: cost.carton_rmb_per_bag,
            land_rmb_per_ton: cost.land_rmb_per_ton,
            land_total_rmb: cost.land_total_rmb,
            land_rmb_per_bag: cost.land_rmb_per_bag,
            port_rmb_per_bag: cost.port_rmb_per_bag,
            domestic_total_rmb_per_bag: cost.domestic_total_rmb_per_bag,
            rebate_rmb_per_bag: cost.rebate_rmb_per_bag,
            net_rmb_per_bag: cost.net_rmb_per_bag,
        };

        debug!(
            mode = %summary.mode,
            tons = summary.tons,
            bags = summary.bags,
            sell_usd_per_bag = summary.sell_usd_per_bag,
            warnings = warnings.len(),
            "报价计算完成"
        );

        Ok(QuoteResult {
            summary,
            breakdown,
            warnings: warnings.into_vec(),
        })
    }
}

/// 使用默认配置计算报价
pub fn calculate_quote(
    snapshot: &ReferenceSnapshot,
    request: &QuoteRequest,
) -> EngineResult<QuoteResult> {
    QuoteEngine::default().calculate(snapshot, request)
}
