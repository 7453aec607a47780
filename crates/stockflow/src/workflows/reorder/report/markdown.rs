use super::super::allocation::RunResult;
use super::super::comparator::ComparisonReport;
use chrono::NaiveDateTime;
use std::fmt::Write as _;

/// Presentation inputs that are not part of the allocation itself.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub generated_at: NaiveDateTime,
    pub currency: String,
}

impl ReportContext {
    fn money(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency, amount)
    }
}

/// Renders the operator-facing Markdown report for one planning session.
pub fn render_markdown(report: &ComparisonReport, context: &ReportContext) -> String {
    let optimized = report.optimized();
    let baseline = report.baseline();
    let mut out = String::new();

    let _ = writeln!(out, "# Reorder Plan Report\n");
    let _ = writeln!(
        out,
        "**Generated On:** {}  ",
        context.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        out,
        "**Low-Stock Items Evaluated:** {}  ",
        optimized.items_evaluated()
    );
    let _ = writeln!(
        out,
        "**Budget Provided:** **{}**\n",
        context.money(report.budget().amount())
    );
    out.push_str("---\n\n");

    out.push_str("## 1. Allocation Summary\n\n");
    out.push_str(
        "Candidates were ranked by profit-to-cost ratio and accepted in that order while \
         their order cost fit the remaining budget.\n\n",
    );
    out.push_str("| Metric | Value |\n| :--- | :--- |\n");
    let _ = writeln!(
        out,
        "| **Total Cost Spent** | **{}** |",
        context.money(optimized.total_cost_spent())
    );
    let _ = writeln!(
        out,
        "| **Remaining Budget** | **{}** |",
        context.money(optimized.remaining_budget())
    );
    let _ = writeln!(
        out,
        "| **Total Expected Profit** | **{}** |",
        context.money(optimized.total_expected_profit())
    );
    let _ = writeln!(
        out,
        "| **Items Selected for Reorder** | {} |",
        optimized.selected().len()
    );
    let _ = writeln!(
        out,
        "| **Items Rejected (Budget Constraint)** | {} |\n",
        optimized.rejected().len()
    );
    out.push_str("---\n\n");

    out.push_str("## 2. Strategy Comparison\n\n");
    out.push_str("| Strategy | Cost Spent | Expected Profit | Selected | Rejected |\n");
    out.push_str("| :--- | ---: | ---: | ---: | ---: |\n");
    for run in [optimized, baseline] {
        write_strategy_row(&mut out, run, context);
    }
    let _ = writeln!(
        out,
        "\nProfit difference (priority score minus cheapest first): **{}**\n",
        context.money(report.profit_uplift())
    );
    out.push_str("---\n\n");

    out.push_str("## 3. Reorder Priority Ranking\n\n");
    out.push_str(
        "All low-stock items in the order the allocator considered them. A higher score \
         means more expected profit per unit of budget.\n\n",
    );
    out.push_str("| Rank | Product Name | Priority Score (Profit/Cost) | Total Order Cost |\n");
    out.push_str("| ---: | :--- | ---: | ---: |\n");
    for (index, item) in report.ranked().into_iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.4} | {} |",
            index + 1,
            escape_cell(item.name()),
            item.priority_score(),
            context.money(item.order_cost())
        );
    }
    out.push_str("\n---\n\n");

    out.push_str("## 4. Selected Orders (Budget Approved)\n\n");
    if optimized.selected().is_empty() {
        out.push_str("*No orders were selected within the budget.*\n");
    } else {
        out.push_str("| Product | Order Qty | Budget Cost | Expected Profit |\n");
        out.push_str("| :--- | ---: | ---: | ---: |\n");
        for item in optimized.selected() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                escape_cell(item.name()),
                item.reorder_quantity(),
                context.money(item.order_cost()),
                context.money(item.order_value())
            );
        }
    }
    out.push_str("\n---\n\n");

    out.push_str("## 5. Rejected Items (Budget Constraint)\n\n");
    if optimized.rejected().is_empty() {
        out.push_str("*All candidate orders fit within the budget.*\n");
    } else {
        out.push_str(
            "These items needed reordering but cost more than the budget remaining when \
             they were reached. Carry them into the next budget cycle.\n\n",
        );
        out.push_str("| Product | Required Cost | Expected Profit |\n");
        out.push_str("| :--- | ---: | ---: |\n");
        for item in optimized.rejected() {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                escape_cell(item.name()),
                context.money(item.order_cost()),
                context.money(item.order_value())
            );
        }
    }

    out
}

fn write_strategy_row(out: &mut String, run: &RunResult, context: &ReportContext) {
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {} |",
        run.run_type().label(),
        context.money(run.total_cost_spent()),
        context.money(run.total_expected_profit()),
        run.selected().len(),
        run.rejected().len()
    );
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
