// ==========================================
// 出口报价计算引擎 - 引擎配置
// ==========================================
// 职责: 规则缺失时的兜底常量与提示开关
// 存储: JSON 文件（缺省键保留默认值）
// ==========================================

use crate::domain::types::ContainerType;
use serde::{Deserialize, Serialize};

/// 报价引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteEngineConfig {
    /// 未配置装柜上限时的默认吨数
    pub default_container_max_tons: f64,

    /// 未配置整柜港杂时的默认值 (RMB/柜)
    pub fcl_port_fallback_20gp_rmb: f64,
    pub fcl_port_fallback_40hq_rmb: f64,

    /// 拼箱港杂高于整柜时给出提示
    pub lcl_vs_fcl_advisory: bool,

    /// 手填内陆运费超出规则区间时给出提示
    pub land_fee_range_advisory: bool,
}

impl Default for QuoteEngineConfig {
    fn default() -> Self {
        Self {
            default_container_max_tons: 20.0,
            fcl_port_fallback_20gp_rmb: 3500.0,
            fcl_port_fallback_40hq_rmb: 4200.0,
            lcl_vs_fcl_advisory: true,
            land_fee_range_advisory: true,
        }
    }
}

impl QuoteEngineConfig {
    /// 整柜港杂兜底值
    pub fn fcl_port_fallback_rmb(&self, container_type: ContainerType) -> f64 {
        match container_type {
            ContainerType::Gp20 => self.fcl_port_fallback_20gp_rmb,
            ContainerType::Hq40 => self.fcl_port_fallback_40hq_rmb,
        }
    }

    /// 从 JSON 文本解析（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
