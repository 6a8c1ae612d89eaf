//! The income and expense chart on the tracker page.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, LineStyle,
        Tooltip, Trigger,
    },
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::tracker::{CURRENT_MONTH, MonthlySeries, PREVIOUS_MONTH};

const INCOME_COLOR: &str = "#16a34a";
const EXPENSE_COLOR: &str = "#dc2626";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct TrackerChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl TrackerChart {
    pub(super) fn monthly(series: &MonthlySeries) -> Self {
        Self {
            id: "monthly-chart",
            options: monthly_chart(series).to_string(),
        }
    }
}

pub(super) fn chart_view(chart: &TrackerChart) -> Markup {
    html!(
        section id="chart" class="w-full mx-auto mb-4" {
            div id=(chart.id) class="min-h-[320px] rounded dark:bg-gray-100" {}
        }
    )
}

/// Creates the script that draws `chart` into its container.
///
/// The script goes in the body after [chart_view] so that it also runs when
/// htmx swaps in a new page body.
pub(super) fn chart_script(chart: &TrackerChart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const chart = echarts.init(chartDom);
            chart.setOption({});

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart.id, chart.options
    );

    html!(script { (PreEscaped(script)) })
}

/// Income and expenses for the current and previous month, current first.
fn monthly_chart(series: &MonthlySeries) -> Chart {
    let labels = vec![
        series.labels[CURRENT_MONTH].clone(),
        series.labels[PREVIOUS_MONTH].clone(),
    ];
    let income = vec![
        series.income[CURRENT_MONTH],
        series.income[PREVIOUS_MONTH],
    ];
    let expense = vec![
        series.expense[CURRENT_MONTH],
        series.expense[PREVIOUS_MONTH],
    ];

    Chart::new()
        .title(
            Title::new()
                .text("Income and Expenses")
                .subtext("Current and previous month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Line::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .line_style(LineStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            Line::new()
                .name("Expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .line_style(LineStyle::new().color(EXPENSE_COLOR))
                .data(expense),
        )
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use crate::tracker::MonthlySeries;

    use super::TrackerChart;

    fn series() -> MonthlySeries {
        MonthlySeries {
            labels: ["May".to_owned(), "April".to_owned()],
            income: [50.0, 10.0],
            expense: [20.0, 5.0],
        }
    }

    #[test]
    fn options_list_current_month_first() {
        let chart = TrackerChart::monthly(&series());

        let april = chart.options.find("April").expect("missing April label");
        let may = chart.options.find("May").expect("missing May label");
        assert!(may < april);
    }

    #[test]
    fn options_include_both_series() {
        let chart = TrackerChart::monthly(&series());

        assert!(chart.options.contains("\"Income\""));
        assert!(chart.options.contains("\"Expense\""));
    }
}
