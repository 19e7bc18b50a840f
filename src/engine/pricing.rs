// ==========================================
// 出口报价计算引擎 - 售价合成
// ==========================================
// 公式:
//   cost_usd = net_rmb / fx
//   sell_usd = cost_usd / (1 - margin)
//   sell_rmb = sell_usd × fx
//   gp_rmb   = sell_rmb - net_rmb
// 前置条件: fx > 0，0 ≤ margin < 1（margin = 1 在此之前拒绝）
// ==========================================

use crate::engine::error::{EngineResult, QuoteError};

/// 汇率校验
pub fn validate_fx_rate(fx_rate: f64) -> EngineResult<f64> {
    if fx_rate.is_finite() && fx_rate > 0.0 {
        Ok(fx_rate)
    } else {
        Err(QuoteError::InvalidFxRate(fx_rate))
    }
}

/// 毛利率校验
pub fn validate_margin(margin_pct: f64) -> EngineResult<f64> {
    if margin_pct.is_finite() && (0.0..1.0).contains(&margin_pct) {
        Ok(margin_pct)
    } else {
        Err(QuoteError::InvalidMargin(margin_pct))
    }
}

/// 售价与毛利
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub cost_usd_per_bag: f64,
    pub sell_usd_per_bag: f64,
    pub sell_rmb_per_bag: f64,
    pub gp_rmb_per_bag: f64,

    pub net_rmb_total: f64,
    pub sell_rmb_total: f64,
    pub sell_usd_total: f64,
    pub gp_rmb_total: f64,
    pub gp_usd_total: f64,
}

// ==========================================
// PriceSynthesizer - 售价合成器
// ==========================================
pub struct PriceSynthesizer {
    // 无状态
}

impl PriceSynthesizer {
    pub fn new() -> Self {
        Self {}
    }

    /// 由每袋净成本合成售价
    pub fn synthesize(
        &self,
        net_rmb_per_bag: f64,
        bags: u64,
        fx_rate: f64,
        margin_pct: f64,
    ) -> EngineResult<PriceQuote> {
        let fx_rate = validate_fx_rate(fx_rate)?;
        let margin_pct = validate_margin(margin_pct)?;
        let bags = bags as f64;

        let cost_usd_per_bag = net_rmb_per_bag / fx_rate;
        let sell_usd_per_bag = cost_usd_per_bag / (1.0 - margin_pct);
        let sell_rmb_per_bag = sell_usd_per_bag * fx_rate;
        let gp_rmb_per_bag = sell_rmb_per_bag - net_rmb_per_bag;
        let gp_rmb_total = gp_rmb_per_bag * bags;

        Ok(PriceQuote {
            cost_usd_per_bag,
            sell_usd_per_bag,
            sell_rmb_per_bag,
            gp_rmb_per_bag,
            net_rmb_total: net_rmb_per_bag * bags,
            sell_rmb_total: sell_rmb_per_bag * bags,
            sell_usd_total: sell_usd_per_bag * bags,
            gp_rmb_total,
            gp_usd_total: gp_rmb_total / fx_rate,
        })
    }
}

impl Default for PriceSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
