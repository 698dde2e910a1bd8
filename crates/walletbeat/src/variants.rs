use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deployment form a wallet ships as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Browser,
    Desktop,
    Mobile,
    Hardware,
    Embedded,
}

impl Variant {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Browser,
            Self::Desktop,
            Self::Mobile,
            Self::Hardware,
            Self::Embedded,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Browser => "Browser extension",
            Self::Desktop => "Desktop app",
            Self::Mobile => "Mobile app",
            Self::Hardware => "Hardware wallet",
            Self::Embedded => "Embedded wallet",
        }
    }

    pub const fn name(self, title_case: bool) -> &'static str {
        match (self, title_case) {
            (Self::Browser, true) => "Browser",
            (Self::Browser, false) => "browser",
            (Self::Desktop, true) => "Desktop",
            (Self::Desktop, false) => "desktop",
            (Self::Mobile, true) => "Mobile",
            (Self::Mobile, false) => "mobile",
            (Self::Hardware, true) => "Hardware",
            (Self::Hardware, false) => "hardware",
            (Self::Embedded, true) => "Embedded",
            (Self::Embedded, false) => "embedded",
        }
    }

    /// Fits a sentence like "This wallet runs {runs_on}".
    pub const fn runs_on(self) -> &'static str {
        match self {
            Self::Browser => "as a browser extension",
            Self::Desktop => "as a desktop application",
            Self::Mobile => "on mobile",
            Self::Hardware => "as a hardware wallet",
            Self::Embedded => "within other applications",
        }
    }

    pub const fn wallet_type(self) -> WalletType {
        match self {
            Self::Browser | Self::Desktop | Self::Mobile => WalletType::Software,
            Self::Hardware => WalletType::Hardware,
            Self::Embedded => WalletType::Embedded,
        }
    }
}

/// Variant groupings used by attribute and criterion scopes.
pub const ALL_VARIANTS: &[Variant] = &[
    Variant::Browser,
    Variant::Desktop,
    Variant::Mobile,
    Variant::Hardware,
    Variant::Embedded,
];
pub const SOFTWARE_VARIANTS: &[Variant] = &[Variant::Browser, Variant::Desktop, Variant::Mobile];
pub const SOFTWARE_AND_EMBEDDED_VARIANTS: &[Variant] = &[
    Variant::Browser,
    Variant::Desktop,
    Variant::Mobile,
    Variant::Embedded,
];
pub const HARDWARE_VARIANTS: &[Variant] = &[Variant::Hardware];
pub const BROWSER_VARIANTS: &[Variant] = &[Variant::Browser];

/// Broad category of wallet, derived from its variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    Software,
    Hardware,
    Embedded,
}

impl WalletType {
    /// Priority order used when picking a wallet's primary type.
    pub const fn ordered() -> [Self; 3] {
        [Self::Software, Self::Hardware, Self::Embedded]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Software => "Software wallet",
            Self::Hardware => "Hardware wallet",
            Self::Embedded => "Embedded wallet",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Hardware => "hardware",
            Self::Embedded => "embedded",
        }
    }

    pub fn variants(self) -> impl Iterator<Item = Variant> {
        Variant::ordered()
            .into_iter()
            .filter(move |variant| variant.wallet_type() == self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    #[error("a wallet must declare at least one variant")]
    Empty,
}

/// Non-empty, ordered set of variants a wallet supports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Variant>", into = "Vec<Variant>")]
pub struct VariantSet(BTreeSet<Variant>);

impl VariantSet {
    pub fn new<I>(variants: I) -> Result<Self, VariantError>
    where
        I: IntoIterator<Item = Variant>,
    {
        let set: BTreeSet<Variant> = variants.into_iter().collect();
        if set.is_empty() {
            return Err(VariantError::Empty);
        }
        Ok(Self(set))
    }

    pub fn single(variant: Variant) -> Self {
        Self(BTreeSet::from([variant]))
    }

    pub fn contains(&self, variant: Variant) -> bool {
        self.0.contains(&variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = Variant> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.0.len() == 1
    }

    /// Variants of this set that also appear in `scope`, in variant order.
    pub fn in_scope(&self, scope: &[Variant]) -> Vec<Variant> {
        self.iter().filter(|variant| scope.contains(variant)).collect()
    }

    pub fn wallet_types(&self) -> BTreeSet<WalletType> {
        self.iter().map(Variant::wallet_type).collect()
    }

    /// The first declared type in `WalletType::ordered()` priority.
    pub fn primary_type(&self) -> WalletType {
        let types = self.wallet_types();
        WalletType::ordered()
            .into_iter()
            .find(|wallet_type| types.contains(wallet_type))
            .unwrap_or(WalletType::Software)
    }
}

impl TryFrom<Vec<Variant>> for VariantSet {
    type Error = VariantError;

    fn try_from(value: Vec<Variant>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariantSet> for Vec<Variant> {
    fn from(value: VariantSet) -> Self {
        value.0.into_iter().collect()
    }
}

/// Tooltip for a variant picker.
pub fn variant_tooltip(variants: &VariantSet, variant: Variant) -> String {
    if variants.is_single() {
        return format!("{}-only wallet", variant.name(true));
    }
    format!("View {} version", variant.name(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_variant_set_is_rejected() {
        assert_eq!(VariantSet::new([]), Err(VariantError::Empty));
        let parsed: Result<VariantSet, _> = serde_json::from_str("[]");
        assert!(parsed.is_err());
    }

    #[test]
    fn variant_set_deduplicates_and_orders() {
        let set = VariantSet::new([Variant::Mobile, Variant::Browser, Variant::Mobile])
            .expect("non-empty set");
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Variant::Browser, Variant::Mobile]
        );
        let json = serde_json::to_string(&set).expect("serializes");
        assert_eq!(json, r#"["browser","mobile"]"#);
    }

    #[test]
    fn primary_type_prefers_software() {
        let set = VariantSet::new([Variant::Hardware, Variant::Mobile]).expect("non-empty set");
        assert_eq!(set.primary_type(), WalletType::Software);
        assert_eq!(
            VariantSet::single(Variant::Embedded).primary_type(),
            WalletType::Embedded
        );
    }

    #[test]
    fn wallet_type_keys_are_snake_case_names() {
        let keys = WalletType::ordered().map(WalletType::key);
        assert_eq!(keys, ["software", "hardware", "embedded"]);
    }

    #[test]
    fn tooltip_depends_on_variant_count() {
        let single = VariantSet::single(Variant::Mobile);
        assert_eq!(variant_tooltip(&single, Variant::Mobile), "Mobile-only wallet");
        let multi = VariantSet::new([Variant::Mobile, Variant::Desktop]).expect("non-empty set");
        assert_eq!(variant_tooltip(&multi, Variant::Desktop), "View desktop version");
    }
}
