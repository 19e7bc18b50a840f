// ==========================================
// 出口报价计算引擎 - 参考数据实体
// ==========================================
// 职责: 产品、包装方案、工厂、成本、港口及各类规则表
// 红线: 引擎只读，不创建/修改任何参考数据
// ==========================================

use crate::domain::types::{ContainerType, TransportMode};
use serde::{Deserialize, Serialize};

// ==========================================
// 产品 (Product)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// 出口退税率（小数，如 0.09）
    #[serde(default)]
    pub refund_rate: f64,
    /// 进项增值税率
    #[serde(default)]
    pub purchase_vat_rate: f64,
    /// 开票加点（出厂价 × (1 + 加点) ≈ 开票价）
    #[serde(default)]
    pub invoice_tax_point: f64,
    /// 起运港
    #[serde(default)]
    pub pol_port_id: Option<String>,
}

// ==========================================
// 包装方案 (Packaging Option)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagingOption {
    pub id: String,
    pub product_id: String,
    /// 单袋净重 (kg)
    pub unit_weight_kg: f64,
    /// 每箱袋数；None 或 0 表示散袋不装箱
    #[serde(default)]
    pub units_per_carton: Option<u32>,
    #[serde(default)]
    pub carton_price_rmb: f64,
    #[serde(default)]
    pub bag_price_rmb: f64,
    #[serde(default)]
    pub inner_pack_type: Option<String>,
}

// ==========================================
// 工厂 (Factory)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: String,
    pub name: String,
    /// 工厂默认起运港（产品未指定起运港时使用）
    #[serde(default)]
    pub default_port_id: Option<String>,
}

/// 工厂-产品出厂成本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryProductCost {
    pub factory_id: String,
    pub product_id: String,
    pub cost_rmb_per_ton: f64,
}

// ==========================================
// 港口与港杂规则
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
}

/// 港杂费规则
///
/// - FCL: 按柜收取 `base_rmb`
/// - LCL: `base_rmb` 含首吨，超出部分按 `extra_rmb_per_ton` 逐吨（向上取整）加收
/// - `container_type` / `port_id` 为空表示通配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortChargesRule {
    #[serde(default)]
    pub id: Option<String>,
    pub mode: TransportMode,
    #[serde(default)]
    pub container_type: Option<ContainerType>,
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub base_rmb: f64,
    #[serde(default)]
    pub extra_rmb_per_ton: f64,
}

/// 装柜上限规则 (product, container_type) → max_tons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerLoadRule {
    pub product_id: String,
    pub container_type: ContainerType,
    pub max_tons: f64,
}

/// 内陆运费规则
///
/// 计算只使用 `default_rmb_per_ton`；min/max 仅用于手填运费的区间提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandFreightRule {
    #[serde(default)]
    pub id: Option<String>,
    pub mode: TransportMode,
    #[serde(default)]
    pub container_type: Option<ContainerType>,
    #[serde(default)]
    pub factory_id: Option<String>,
    #[serde(default)]
    pub min_rmb_per_ton: Option<f64>,
    #[serde(default)]
    pub max_rmb_per_ton: Option<f64>,
    #[serde(default)]
    pub default_rmb_per_ton: f64,
}

/// 工厂包材单价覆写（None 表示不覆写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryPackagingOverride {
    pub factory_id: String,
    pub packaging_option_id: String,
    #[serde(default)]
    pub carton_price_rmb_override: Option<f64>,
    #[serde(default)]
    pub bag_price_rmb_override: Option<f64>,
}

// ==========================================
// ReferenceSnapshot - 参考数据快照
// ==========================================

/// 一次报价计算所使用的全部参考数据（不可变快照）
///
/// 引擎不关心快照来源（文件/数据库/网络），也不负责与维护界面的同步。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSnapshot {
    pub products: Vec<Product>,
    pub packaging_options: Vec<PackagingOption>,
    pub factories: Vec<Factory>,
    pub factory_product_costs: Vec<FactoryProductCost>,
    pub ports: Vec<Port>,
    pub port_charges_rules: Vec<PortChargesRule>,
    pub container_load_rules: Vec<ContainerLoadRule>,
    pub land_freight_rules: Vec<LandFreightRule>,
    pub factory_packaging_overrides: Vec<FactoryPackagingOverride>,
}

impl ReferenceSnapshot {
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn find_packaging_option(&self, packaging_option_id: &str) -> Option<&PackagingOption> {
        self.packaging_options
            .iter()
            .find(|p| p.id == packaging_option_id)
    }

    pub fn find_factory(&self, factory_id: &str) -> Option<&Factory> {
        self.factories.iter().find(|f| f.id == factory_id)
    }

    pub fn find_port(&self, port_id: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }

    /// 工厂-产品出厂成本（精确匹配）
    pub fn find_factory_cost(
        &self,
        factory_id: &str,
        product_id: &str,
    ) -> Option<&FactoryProductCost> {
        self.factory_product_costs
            .iter()
            .find(|c| c.factory_id == factory_id && c.product_id == product_id)
    }
}
