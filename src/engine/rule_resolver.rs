// ==========================================
// 出口报价计算引擎 - 规则解析器
// ==========================================
// 规则: 最具体匹配优先，未命中退回通配行，仍未命中交由调用方兜底
// 优先级: 精确柜型+精确键 -> 精确柜型+通配键 -> 通配柜型+精确键 -> 通配柜型+通配键
// 红线: 解析永不报错，"未找到"以 None / Fallback 表达
// ==========================================

use crate::domain::reference::{
    ContainerLoadRule, FactoryPackagingOverride, LandFreightRule, PortChargesRule,
    ReferenceSnapshot,
};
use crate::domain::types::{ContainerType, ResolutionSource, TransportMode};

// ==========================================
// Resolved - 带来源标记的解析结果
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ResolutionSource,
}

impl<T> Resolved<T> {
    pub fn table(value: T) -> Self {
        Self {
            value,
            source: ResolutionSource::Table,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: ResolutionSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ResolutionSource::Fallback
    }
}

/// 命中取表值，否则取兜底值
pub fn resolve_or<T>(found: Option<T>, fallback: impl FnOnce() -> T) -> Resolved<T> {
    match found {
        Some(value) => Resolved::table(value),
        None => Resolved::fallback(fallback()),
    }
}

// ==========================================
// ScopedRule - 按 (运输方式, 柜型, 作用域键) 匹配的规则
// ==========================================

pub trait ScopedRule {
    fn mode(&self) -> TransportMode;
    /// None 表示适用所有柜型
    fn container_type(&self) -> Option<ContainerType>;
    /// None 或空串表示通配
    fn scope_key(&self) -> Option<&str>;
}

impl ScopedRule for PortChargesRule {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn container_type(&self) -> Option<ContainerType> {
        self.container_type
    }

    fn scope_key(&self) -> Option<&str> {
        self.port_id.as_deref()
    }
}

impl ScopedRule for LandFreightRule {
    fn mode(&self) -> TransportMode {
        self.mode
    }

    fn container_type(&self) -> Option<ContainerType> {
        self.container_type
    }

    fn scope_key(&self) -> Option<&str> {
        self.factory_id.as_deref()
    }
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.map(str::trim).filter(|k| !k.is_empty())
}

/// 匹配等级（越小越具体），None 表示不匹配
fn match_rank<R: ScopedRule>(
    rule: &R,
    mode: TransportMode,
    container_type: Option<ContainerType>,
    key: Option<&str>,
) -> Option<u8> {
    if rule.mode() != mode {
        return None;
    }

    let container_rank = match rule.container_type() {
        c if c == container_type => 0,
        None => 1,
        Some(_) => return None,
    };

    let key_rank = match (non_empty(rule.scope_key()), key) {
        (None, _) => 1,
        (Some(rule_key), Some(wanted)) if rule_key == wanted => 0,
        (Some(_), _) => return None,
    };

    Some(container_rank * 2 + key_rank)
}

/// 查找最具体的规则行；同等级取表中靠前者
pub fn find_scoped_rule<'a, R: ScopedRule>(
    rules: &'a [R],
    mode: TransportMode,
    container_type: Option<ContainerType>,
    key: Option<&str>,
) -> Option<&'a R> {
    let key = non_empty(key);
    let mut best: Option<(u8, &'a R)> = None;

    for rule in rules {
        if let Some(rank) = match_rank(rule, mode, container_type, key) {
            match best {
                Some((best_rank, _)) if best_rank <= rank => {}
                _ => best = Some((rank, rule)),
            }
            if rank == 0 {
                break;
            }
        }
    }

    best.map(|(_, rule)| rule)
}

// ==========================================
// RuleResolver - 面向参考数据快照的规则查询
// ==========================================

pub struct RuleResolver<'a> {
    snapshot: &'a ReferenceSnapshot,
}

impl<'a> RuleResolver<'a> {
    pub fn new(snapshot: &'a ReferenceSnapshot) -> Self {
        Self { snapshot }
    }

    /// 装柜上限（精确匹配，无通配；max_tons 非正视为未配置）
    pub fn container_load(
        &self,
        product_id: &str,
        container_type: ContainerType,
    ) -> Option<&'a ContainerLoadRule> {
        self.snapshot.container_load_rules.iter().find(|r| {
            r.product_id == product_id
                && r.container_type == container_type
                && r.max_tons.is_finite()
                && r.max_tons > 0.0
        })
    }

    /// 港杂规则（港口 → 通配）
    pub fn port_charges(
        &self,
        mode: TransportMode,
        container_type: ContainerType,
        port_id: Option<&str>,
    ) -> Option<&'a PortChargesRule> {
        find_scoped_rule(
            &self.snapshot.port_charges_rules,
            mode,
            Some(container_type),
            port_id,
        )
    }

    /// 内陆运费规则（工厂 → 通配）
    pub fn land_freight(
        &self,
        mode: TransportMode,
        container_type: ContainerType,
        factory_id: &str,
    ) -> Option<&'a LandFreightRule> {
        find_scoped_rule(
            &self.snapshot.land_freight_rules,
            mode,
            Some(container_type),
            Some(factory_id),
        )
    }

    /// 工厂包材覆写（精确匹配；缺失即"不覆写"）
    pub fn packaging_override(
        &self,
        factory_id: &str,
        packaging_option_id: &str,
    ) -> Option<&'a FactoryPackagingOverride> {
        self.snapshot
            .factory_packaging_overrides
            .iter()
            .find(|o| o.factory_id == factory_id && o.packaging_option_id == packaging_option_id)
    }
}
