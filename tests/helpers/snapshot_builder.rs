// ==========================================
// 参考数据快照构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use export_quotation::domain::reference::{
    ContainerLoadRule, Factory, FactoryPackagingOverride, FactoryProductCost, LandFreightRule,
    PackagingOption, Port, PortChargesRule, Product, ReferenceSnapshot,
};
use export_quotation::domain::types::{ContainerType, TransportMode};
use export_quotation::domain::{PackagingOverrides, QuantityHint, QuoteRequest};

pub const PRODUCT_ID: &str = "P-PVC";
pub const PACKAGING_ID: &str = "PK-25KG";
pub const FACTORY_ID: &str = "F-ZIBO";

// ==========================================
// SnapshotBuilder
// ==========================================

/// 默认快照: 25kg/袋，20GP 装 17.5 吨，出厂价 3000，加点 0.03，退税 0.09，无任何运费/港杂规则
pub struct SnapshotBuilder {
    snapshot: ReferenceSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        let snapshot = ReferenceSnapshot {
            products: vec![Product {
                id: PRODUCT_ID.to_string(),
                name: "PVC 树脂".to_string(),
                refund_rate: 0.09,
                purchase_vat_rate: 0.13,
                invoice_tax_point: 0.03,
                pol_port_id: None,
            }],
            packaging_options: vec![PackagingOption {
                id: PACKAGING_ID.to_string(),
                product_id: PRODUCT_ID.to_string(),
                unit_weight_kg: 25.0,
                units_per_carton: None,
                carton_price_rmb: 6.0,
                bag_price_rmb: 0.8,
                inner_pack_type: Some("PP_WOVEN".to_string()),
            }],
            factories: vec![Factory {
                id: FACTORY_ID.to_string(),
                name: "淄博工厂".to_string(),
                default_port_id: None,
            }],
            factory_product_costs: vec![FactoryProductCost {
                factory_id: FACTORY_ID.to_string(),
                product_id: PRODUCT_ID.to_string(),
                cost_rmb_per_ton: 3000.0,
            }],
            ports: vec![
                Port {
                    id: "QINGDAO".to_string(),
                    name: "青岛".to_string(),
                },
                Port {
                    id: "TIANJIN".to_string(),
                    name: "天津".to_string(),
                },
            ],
            container_load_rules: vec![ContainerLoadRule {
                product_id: PRODUCT_ID.to_string(),
                container_type: ContainerType::Gp20,
                max_tons: 17.5,
            }],
            ..Default::default()
        };

        Self { snapshot }
    }

    pub fn pol_port(mut self, port_id: &str) -> Self {
        self.snapshot.products[0].pol_port_id = Some(port_id.to_string());
        self
    }

    pub fn factory_default_port(mut self, port_id: &str) -> Self {
        self.snapshot.factories[0].default_port_id = Some(port_id.to_string());
        self
    }

    pub fn refund_rate(mut self, rate: f64) -> Self {
        self.snapshot.products[0].refund_rate = rate;
        self
    }

    pub fn factory_cost(mut self, cost_rmb_per_ton: f64) -> Self {
        self.snapshot.factory_product_costs[0].cost_rmb_per_ton = cost_rmb_per_ton;
        self
    }

    pub fn without_factory_cost(mut self) -> Self {
        self.snapshot.factory_product_costs.clear();
        self
    }

    pub fn without_container_rules(mut self) -> Self {
        self.snapshot.container_load_rules.clear();
        self
    }

    pub fn container_capacity(mut self, container_type: ContainerType, max_tons: f64) -> Self {
        self.snapshot
            .container_load_rules
            .retain(|r| r.container_type != container_type);
        self.snapshot.container_load_rules.push(ContainerLoadRule {
            product_id: PRODUCT_ID.to_string(),
            container_type,
            max_tons,
        });
        self
    }

    pub fn packaging(mut self, f: impl FnOnce(&mut PackagingOption)) -> Self {
        f(&mut self.snapshot.packaging_options[0]);
        self
    }

    pub fn extra_packaging(mut self, option: PackagingOption) -> Self {
        self.snapshot.packaging_options.push(option);
        self
    }

    pub fn port_rule(
        mut self,
        mode: TransportMode,
        container_type: ContainerType,
        port_id: Option<&str>,
        base_rmb: f64,
        extra_rmb_per_ton: f64,
    ) -> Self {
        self.snapshot.port_charges_rules.push(PortChargesRule {
            id: None,
            mode,
            container_type: Some(container_type),
            port_id: port_id.map(|s| s.to_string()),
            base_rmb,
            extra_rmb_per_ton,
        });
        self
    }

    pub fn land_rule(
        mut self,
        mode: TransportMode,
        container_type: ContainerType,
        factory_id: Option<&str>,
        default_rmb_per_ton: f64,
    ) -> Self {
        self.snapshot.land_freight_rules.push(LandFreightRule {
            id: None,
            mode,
            container_type: Some(container_type),
            factory_id: factory_id.map(|s| s.to_string()),
            min_rmb_per_ton: None,
            max_rmb_per_ton: None,
            default_rmb_per_ton,
        });
        self
    }

    pub fn packaging_override(mut self, bag_price: Option<f64>, carton_price: Option<f64>) -> Self {
        self.snapshot
            .factory_packaging_overrides
            .push(FactoryPackagingOverride {
                factory_id: FACTORY_ID.to_string(),
                packaging_option_id: PACKAGING_ID.to_string(),
                carton_price_rmb_override: carton_price,
                bag_price_rmb_override: bag_price,
            });
        self
    }

    pub fn build(self) -> ReferenceSnapshot {
        self.snapshot
    }
}

// ==========================================
// QuoteRequest 构建
// ==========================================

pub fn request(mode: TransportMode) -> QuoteRequest {
    QuoteRequest {
        product_id: PRODUCT_ID.to_string(),
        packaging_option_id: PACKAGING_ID.to_string(),
        factory_id: FACTORY_ID.to_string(),
        mode,
        container_type: ContainerType::Gp20,
        fx_rate: 7.0,
        margin_pct: 0.1,
        quantity: None,
        packaging_overrides: PackagingOverrides::default(),
        land_fee_override_rmb_per_ton: None,
    }
}

pub fn lcl_request(hint: QuantityHint) -> QuoteRequest {
    QuoteRequest {
        quantity: Some(hint),
        ..request(TransportMode::Lcl)
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
}
