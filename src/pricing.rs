pub const DEFAULT_CURRENCY: &str = "£";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Billing {
    Monthly,
    Annual,
}

impl Billing {
    /// The toggle is a checkbox; checked means annual billing.
    pub fn from_toggle(checked: bool) -> Self {
        if checked {
            Billing::Annual
        } else {
            Billing::Monthly
        }
    }

    pub fn is_annual(self) -> bool {
        self == Billing::Annual
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub name: &'static str,
    pub monthly: u32,
    /// Per-month price when billed annually.
    pub annual: u32,
    pub currency: Option<&'static str>,
    pub features: &'static [&'static str],
}

impl Plan {
    pub fn price(&self, billing: Billing) -> u32 {
        match billing {
            Billing::Monthly => self.monthly,
            Billing::Annual => self.annual,
        }
    }

    pub fn price_label(&self, billing: Billing) -> String {
        format!(
            "{}{}",
            self.currency.unwrap_or(DEFAULT_CURRENCY),
            self.price(billing)
        )
    }
}

pub const PLANS: &[Plan] = &[
    Plan {
        name: "Starter",
        monthly: 19,
        annual: 15,
        currency: None,
        features: &["1 store", "Review-to-post automation", "Email support"],
    },
    Plan {
        name: "Growth",
        monthly: 49,
        annual: 39,
        currency: None,
        features: &["3 stores", "Instagram and Facebook publishing", "Priority support"],
    },
    Plan {
        name: "Agency",
        monthly: 129,
        annual: 99,
        currency: None,
        features: &["Unlimited stores", "Team seats", "Dedicated onboarding"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn label_switches_with_billing() {
        let plan = &PLANS[1];
        assert_eq!(plan.price_label(Billing::Monthly), "£49");
        assert_eq!(plan.price_label(Billing::Annual), "£39");
    }

    #[test]
    fn explicit_currency_wins_over_default() {
        let plan = Plan {
            currency: Some("$"),
            ..PLANS[0].clone()
        };
        assert_eq!(plan.price_label(Billing::Annual), "$15");
    }

    #[test]
    fn toggle_maps_to_billing() {
        assert_eq!(Billing::from_toggle(true), Billing::Annual);
        assert_eq!(Billing::from_toggle(false), Billing::Monthly);
    }

    #[test]
    fn annual_is_never_pricier() {
        for plan in PLANS {
            assert!(plan.annual <= plan.monthly, "{}", plan.name);
        }
    }
}
