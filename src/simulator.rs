//! Widget models for walkthrough phases 01 and 02.
//!
//! The deposit form and the capital-multiplier calculator are deterministic
//! arithmetic over a deposit amount; all the motion on screen is driven by
//! the numbers produced here.

use serde::Serialize;

/// Up-to-10x credit against deposited collateral.
pub const CREDIT_MULTIPLIER: f64 = 10.0;
/// What an overcollateralized venue lends against the same deposit.
pub const TRADITIONAL_LTV: f64 = 0.7;
/// Illustrative annual yield on deployed trading power.
pub const ESTIMATED_APY: f64 = 0.12;

pub const LEVERAGE_MIN: u8 = 1;
pub const LEVERAGE_MAX: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepositAsset {
    pub symbol: &'static str,
    pub glyph: &'static str,
}

pub const DEPOSIT_ASSETS: &[DepositAsset] = &[
    DepositAsset { symbol: "ETH", glyph: "⟠" },
    DepositAsset { symbol: "BTC", glyph: "₿" },
    DepositAsset { symbol: "USDC", glyph: "$" },
];

/// Group whole dollars with thousands separators ("10450" → "10,450").
pub fn fmt_usd(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Phase 01 — deposit form
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DepositSim {
    amount_usd: f64,
    asset: usize,
    deposited: bool,
}

impl DepositSim {
    pub fn new(amount_usd: f64, asset: usize) -> Self {
        Self {
            amount_usd: amount_usd.max(0.0),
            asset: asset.min(DEPOSIT_ASSETS.len() - 1),
            deposited: false,
        }
    }

    pub fn amount_usd(&self) -> f64 {
        self.amount_usd
    }

    pub fn asset(&self) -> DepositAsset {
        DEPOSIT_ASSETS[self.asset]
    }

    pub fn asset_index(&self) -> usize {
        self.asset
    }

    pub fn is_deposited(&self) -> bool {
        self.deposited
    }

    /// Negative input clamps to zero. Editing un-confirms the deposit.
    pub fn set_amount(&mut self, amount_usd: f64) {
        self.amount_usd = amount_usd.max(0.0);
        self.deposited = false;
    }

    /// Out-of-range index clamps to the last asset. Also un-confirms.
    pub fn select_asset(&mut self, index: usize) {
        self.asset = index.min(DEPOSIT_ASSETS.len() - 1);
        self.deposited = false;
    }

    pub fn confirm(&mut self) {
        self.deposited = true;
    }

    /// Credit available against the deposit.
    pub fn credit_line(&self) -> f64 {
        self.amount_usd * CREDIT_MULTIPLIER
    }

    /// The four confirmation lines shown after a deposit lands.
    pub fn flow_steps(&self) -> [String; 4] {
        [
            "Wallet connected".to_string(),
            format!(
                "${} worth of {} deposited",
                fmt_usd(self.amount_usd),
                self.asset().symbol
            ),
            "Collateral secured".to_string(),
            format!("Up to ${} leverage ready", fmt_usd(self.credit_line())),
        ]
    }
}

// =============================================================================
// Phase 02 — capital-multiplier calculator
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeverageCalc {
    leverage: u8,
}

impl LeverageCalc {
    pub fn new() -> Self {
        Self { leverage: 5 }
    }

    pub fn leverage(&self) -> u8 {
        self.leverage
    }

    /// Slider bounds are 1..=10; anything else clamps.
    pub fn set_leverage(&mut self, value: u8) {
        self.leverage = value.clamp(LEVERAGE_MIN, LEVERAGE_MAX);
    }

    pub fn total_power(&self, deposit_usd: f64) -> f64 {
        deposit_usd * f64::from(self.leverage)
    }

    pub fn traditional_power(&self, deposit_usd: f64) -> f64 {
        deposit_usd * TRADITIONAL_LTV
    }

    pub fn estimated_yield(&self, deposit_usd: f64) -> f64 {
        self.total_power(deposit_usd) * ESTIMATED_APY
    }

    /// Trading-power multiple versus the traditional baseline. A zero
    /// deposit makes the ratio 0/0; report 0 rather than NaN.
    pub fn advantage(&self, deposit_usd: f64) -> f64 {
        let ratio = self.total_power(deposit_usd) / self.traditional_power(deposit_usd);
        if ratio.is_finite() {
            ratio
        } else {
            0.0
        }
    }

    /// Badge text, one decimal: "7.1x more trading power".
    pub fn advantage_badge(&self, deposit_usd: f64) -> String {
        format!("{:.1}x more trading power", self.advantage(deposit_usd))
    }
}

impl Default for LeverageCalc {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_usd_grouping() {
        assert_eq!(fmt_usd(0.0), "0");
        assert_eq!(fmt_usd(950.0), "950");
        assert_eq!(fmt_usd(1000.0), "1,000");
        assert_eq!(fmt_usd(10450.0), "10,450");
        assert_eq!(fmt_usd(1_000_000.0), "1,000,000");
        assert_eq!(fmt_usd(-5.0), "0");
    }

    #[test]
    fn test_deposit_clamps_negative_amount() {
        let mut sim = DepositSim::new(-50.0, 0);
        assert_eq!(sim.amount_usd(), 0.0);
        sim.set_amount(-1.0);
        assert_eq!(sim.amount_usd(), 0.0);
        sim.set_amount(1234.0);
        assert_eq!(sim.amount_usd(), 1234.0);
    }

    #[test]
    fn test_deposit_asset_clamps_index() {
        let sim = DepositSim::new(1000.0, 99);
        assert_eq!(sim.asset().symbol, "USDC");
        let sim = DepositSim::new(1000.0, 1);
        assert_eq!(sim.asset().symbol, "BTC");
    }

    #[test]
    fn test_editing_unconfirms() {
        let mut sim = DepositSim::new(1000.0, 0);
        sim.confirm();
        assert!(sim.is_deposited());
        sim.set_amount(2000.0);
        assert!(!sim.is_deposited());
        sim.confirm();
        sim.select_asset(1);
        assert!(!sim.is_deposited());
    }

    #[test]
    fn test_flow_steps_text() {
        let mut sim = DepositSim::new(1000.0, 0);
        sim.confirm();
        let steps = sim.flow_steps();
        assert_eq!(steps[0], "Wallet connected");
        assert_eq!(steps[1], "$1,000 worth of ETH deposited");
        assert_eq!(steps[2], "Collateral secured");
        assert_eq!(steps[3], "Up to $10,000 leverage ready");
    }

    #[test]
    fn test_credit_line() {
        let sim = DepositSim::new(2500.0, 2);
        assert_eq!(sim.credit_line(), 25_000.0);
    }

    #[test]
    fn test_leverage_clamps() {
        let mut calc = LeverageCalc::new();
        assert_eq!(calc.leverage(), 5);
        calc.set_leverage(0);
        assert_eq!(calc.leverage(), 1);
        calc.set_leverage(200);
        assert_eq!(calc.leverage(), 10);
        calc.set_leverage(7);
        assert_eq!(calc.leverage(), 7);
    }

    #[test]
    fn test_power_arithmetic() {
        let calc = LeverageCalc::new();
        assert_eq!(calc.total_power(1000.0), 5000.0);
        assert_eq!(calc.traditional_power(1000.0), 700.0);
        assert_eq!(calc.estimated_yield(1000.0), 600.0);
    }

    #[test]
    fn test_advantage_ratio() {
        let calc = LeverageCalc::new();
        // 5x vs 0.7 LTV → 7.142..., shown as 7.1x.
        assert!((calc.advantage(1000.0) - 5.0 / 0.7).abs() < 1e-12);
        assert_eq!(calc.advantage_badge(1000.0), "7.1x more trading power");
        // Deposit-independent: the ratio is leverage / LTV.
        assert_eq!(calc.advantage(1000.0), calc.advantage(50.0));
    }

    #[test]
    fn test_advantage_zero_deposit() {
        let calc = LeverageCalc::new();
        assert_eq!(calc.advantage(0.0), 0.0);
        assert_eq!(calc.advantage_badge(0.0), "0.0x more trading power");
    }
}
