use crate::cli::{CustomersArgs, Layout};
use crate::output::OutputWriter;
use crate::output_types::CustomerRow;
use anyhow::Result;
use custmap_core::models::Customer;
use custmap_core::ports::CustomerDirectory;
use custmap_store::MemoryCustomerDirectory;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Cards per row in the grid layout
const GRID_COLUMNS: usize = 2;

pub async fn execute(args: CustomersArgs, output: &OutputWriter) -> Result<()> {
    let directory = MemoryCustomerDirectory::seeded();
    let customers = directory.list_customers().await?;

    if output.is_json() {
        let rows: Vec<CustomerRow> = customers.iter().map(CustomerRow::from).collect();
        return output.result(rows);
    }

    output.section(format!("Customers ({})", customers.len()));
    match args.layout {
        Layout::List => output.table(customers.iter().map(CustomerRow::from).collect())?,
        Layout::Grid => {
            let mut builder = Builder::default();
            for row in customers.chunks(GRID_COLUMNS) {
                let mut cells: Vec<String> = row.iter().map(card).collect();
                cells.resize(GRID_COLUMNS, String::new());
                builder.push_record(cells);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            output.rendered_table(table);
        }
    }

    Ok(())
}

fn card(customer: &Customer) -> String {
    format!("#{} {}\n{}", customer.id, customer.name, customer.location())
}
