//! HTML components shared by several route modules

use diary_config::CurrencyConfig;
use diary_core::{Analytics, ItemType, Person};
use diary_utils::{escape_html, format_amount};

/// Monetary value with the configured symbol and precision
pub fn money(currency: &CurrencyConfig, value: f64) -> String {
    let formatted = format_amount(value.abs(), currency.decimal_places as usize);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}{}", currency.symbol, formatted)
    } else {
        format!("{}{}", currency.symbol, formatted)
    }
}

/// Nutrient or calorie value
pub fn nutrient(value: f64) -> String {
    format_amount(value, 1)
}

/// Analytics summary panel, optionally as an out-of-band swap into `#analytics`
pub fn analytics_panel(analytics: &Analytics, currency: &CurrencyConfig, oob: bool) -> String {
    let persons: String = if analytics.persons.is_empty() {
        "<p class='text-sm text-gray-500'>No debts</p>".to_string()
    } else {
        let rows: String = analytics
            .persons
            .iter()
            .map(|p| {
                let (class, note) = if p.total_debt > 0.0 {
                    ("text-red-600", "you owe")
                } else if p.total_debt < 0.0 {
                    ("text-green-600", "owes you")
                } else {
                    ("text-gray-500", "settled")
                };
                format!(
                    "<tr><td class='py-1'>{}</td><td class='py-1 text-right {}'>{}</td><td class='py-1 pl-2 text-xs text-gray-500'>{}</td></tr>",
                    escape_html(&p.person_name),
                    class,
                    money(currency, p.total_debt),
                    note
                )
            })
            .collect();
        format!("<table class='w-full text-sm'>{}</table>", rows)
    };

    format!(
        r#"<div id='analytics' {} class='bg-white rounded-xl shadow-sm p-6'>
    <div class='grid grid-cols-2 md:grid-cols-5 gap-4 mb-4'>
        <div><p class='text-sm text-gray-500'>Spent</p><p class='text-xl font-bold'>{}</p></div>
        <div><p class='text-sm text-gray-500'>Calories</p><p class='text-xl font-bold'>{}</p></div>
        <div><p class='text-sm text-gray-500'>Fats</p><p class='text-xl font-bold'>{}</p></div>
        <div><p class='text-sm text-gray-500'>Carbs</p><p class='text-xl font-bold'>{}</p></div>
        <div><p class='text-sm text-gray-500'>Proteins</p><p class='text-xl font-bold'>{}</p></div>
    </div>
    <h4 class='font-semibold mb-2'>Persons</h4>
    {}
</div>"#,
        if oob { "hx-swap-oob='true'" } else { "" },
        money(currency, analytics.total_spent),
        nutrient(analytics.total_calories),
        nutrient(analytics.total_fats),
        nutrient(analytics.total_carbs),
        nutrient(analytics.total_proteins),
        persons
    )
}

/// `<option>` list of item types
pub fn item_type_options(selected: u8) -> String {
    ItemType::ALL
        .iter()
        .map(|t| {
            format!(
                "<option value='{}' {}>{}</option>",
                t.as_u8(),
                if t.as_u8() == selected { "selected" } else { "" },
                t.label()
            )
        })
        .collect()
}

/// `<option>` list of visible persons; the selected one is kept even if hidden
pub fn person_options(persons: &[Person], selected: u64) -> String {
    let mut options = format!(
        "<option value='0' {}>-</option>",
        if selected == 0 { "selected" } else { "" }
    );
    for person in persons.iter().filter(|p| !p.is_hidden || p.person_id == selected) {
        options.push_str(&format!(
            "<option value='{}' {}>{}</option>",
            person.person_id,
            if person.person_id == selected { "selected" } else { "" },
            escape_html(&person.person_name)
        ));
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::PersonAnalytics;

    #[test]
    fn test_money() {
        let currency = CurrencyConfig::default();
        assert_eq!(money(&currency, 1234.5), "$1,234.50");
        assert_eq!(money(&currency, -10.0), "-$10.00");
        assert_eq!(money(&currency, -0.001), "$0.00");
    }

    #[test]
    fn test_analytics_panel_oob() {
        let analytics = Analytics {
            total_spent: 7.0,
            persons: vec![PersonAnalytics {
                person_id: 3,
                user_id: 1,
                person_name: "<Anna>".to_string(),
                total_debt: -2.0,
            }],
            ..Default::default()
        };
        let html = analytics_panel(&analytics, &CurrencyConfig::default(), true);
        assert!(html.contains("hx-swap-oob='true'"));
        assert!(html.contains("$7.00"));
        assert!(html.contains("&lt;Anna&gt;"));
        assert!(html.contains("owes you"));

        let html = analytics_panel(&Analytics::default(), &CurrencyConfig::default(), false);
        assert!(!html.contains("hx-swap-oob"));
    }

    #[test]
    fn test_person_options_hide_hidden() {
        let persons = vec![
            Person { person_id: 1, user_id: 1, person_name: "Anna".to_string(), is_hidden: false },
            Person { person_id: 2, user_id: 1, person_name: "Boris".to_string(), is_hidden: true },
        ];
        let html = person_options(&persons, 0);
        assert!(html.contains("Anna"));
        assert!(!html.contains("Boris"));
        assert!(person_options(&persons, 2).contains("Boris"));
        assert!(item_type_options(2).contains("<option value='2' selected>"));
    }
}
