/// Features offered in the dashboard's histogram selector, with a one-line
/// description each.
pub const FEATURES: &[(&str, &str)] = &[
    ("LotFrontage", "Linear feet of street connected to the lot."),
    ("LotArea", "Lot size in square feet."),
    ("YearBuilt", "Original construction year."),
    ("TotalBsmtSF", "Total basement area in square feet."),
    ("1stFlrSF", "First floor area in square feet."),
    ("2ndFlrSF", "Second floor area in square feet."),
    ("TotRmsAbvGrd", "Total rooms above grade, bathrooms excluded."),
    ("GarageYrBlt", "Year the garage was built."),
    ("GarageArea", "Garage size in square feet."),
    ("MoSold", "Month sold (1-12)."),
    ("YrSold", "Year sold."),
    ("SalePrice", "Sale price of the house."),
];

pub fn describe(feature: &str) -> Option<&'static str> {
    FEATURES
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, text)| *text)
}
