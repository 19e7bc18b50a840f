// ==========================================
// 出口报价计算引擎 - 降级提示收集器
// ==========================================
// 职责: 在各解析步骤间传递，记录非致命的降级事件
// 红线: 只追加，不中断计算；顺序即流水线顺序
// ==========================================

use crate::domain::quote::{QuoteWarning, WarningKind};

/// 降级提示收集器
#[derive(Debug, Default)]
pub struct WarningCollector {
    warnings: Vec<QuoteWarning>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条提示（同时输出 warn 日志）
    pub fn push(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{}", message);
        self.warnings.push(QuoteWarning { kind, message });
    }

    pub fn contains(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_vec(self) -> Vec<QuoteWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_push_order() {
        let mut collector = WarningCollector::new();
        assert!(collector.is_empty());

        collector.push(WarningKind::LandFreightRuleMissing, "内陆运费规则缺失");
        collector.push(WarningKind::FclPortRuleMissing, "整柜港杂规则缺失".to_string());

        assert_eq!(collector.len(), 2);
        assert!(collector.contains(WarningKind::FclPortRuleMissing));
        assert!(!collector.contains(WarningKind::AutoSwitchedToLcl));

        let kinds: Vec<WarningKind> = collector.into_vec().into_iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::LandFreightRuleMissing, WarningKind::FclPortRuleMissing]
        );
    }
}
