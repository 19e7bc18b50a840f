// ==========================================
// 出口报价计算引擎 - 领域类型定义
// ==========================================
// 职责: 运输方式、柜型、数量口径、价格来源等枚举
// 序列化格式: 与参考数据 JSON 中的取值保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 运输方式 (Transport Mode)
// ==========================================
// FCL: 整柜; LCL: 拼箱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    #[serde(rename = "FCL")]
    Fcl, // 整柜
    #[serde(rename = "LCL")]
    Lcl, // 拼箱
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Fcl => write!(f, "FCL"),
            TransportMode::Lcl => write!(f, "LCL"),
        }
    }
}

// ==========================================
// 柜型 (Container Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "20GP")]
    Gp20, // 20尺普柜
    #[serde(rename = "40HQ")]
    Hq40, // 40尺高柜
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerType::Gp20 => write!(f, "20GP"),
            ContainerType::Hq40 => write!(f, "40HQ"),
        }
    }
}

// ==========================================
// 数量输入口径 (Quantity Input Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QtyInputType {
    Tons, // 按吨
    Bags, // 按袋
}

impl fmt::Display for QtyInputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QtyInputType::Tons => write!(f, "tons"),
            QtyInputType::Bags => write!(f, "bags"),
        }
    }
}

// ==========================================
// 包材单价来源 (Price Source)
// ==========================================
// 优先级: custom(本次手填) > override(工厂覆写) > default(包装方案默认)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Default,
    Override,
    Custom,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::Default => write!(f, "default"),
            PriceSource::Override => write!(f, "override"),
            PriceSource::Custom => write!(f, "custom"),
        }
    }
}

// ==========================================
// 内陆运费来源 (Land Fee Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandFeeSource {
    Override, // 本次手填
    Table,    // 规则表命中
    Fallback, // 未命中规则，按 0 计
}

impl fmt::Display for LandFeeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandFeeSource::Override => write!(f, "override"),
            LandFeeSource::Table => write!(f, "table"),
            LandFeeSource::Fallback => write!(f, "fallback"),
        }
    }
}

// ==========================================
// 规则解析来源 (Resolution Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Table,    // 规则表命中（精确或通配）
    Fallback, // 兜底常量
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Table => write!(f, "table"),
            ResolutionSource::Fallback => write!(f, "fallback"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_reference_data() {
        assert_eq!(serde_json::to_string(&TransportMode::Fcl).unwrap(), "\"FCL\"");
        assert_eq!(serde_json::to_string(&ContainerType::Hq40).unwrap(), "\"40HQ\"");
        assert_eq!(serde_json::to_string(&QtyInputType::Bags).unwrap(), "\"bags\"");
        assert_eq!(serde_json::to_string(&PriceSource::Override).unwrap(), "\"override\"");

        let c: ContainerType = serde_json::from_str("\"20GP\"").unwrap();
        assert_eq!(c, ContainerType::Gp20);
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(ContainerType::Gp20.to_string(), "20GP");
        assert_eq!(TransportMode::Lcl.to_string(), "LCL");
        assert_eq!(LandFeeSource::Fallback.to_string(), "fallback");
    }
}
