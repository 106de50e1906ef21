//! Sales record schema and the row normalizer
//!
//! The source table uses display-style column names (`Customer Name`,
//! `Final Amount`, ...). The wire schema uses stable snake_case keys. Both
//! are declared once in [`sales_columns!`] so the two can never drift.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw storage row keyed by display-style column name
pub type RawRow = Map<String, Value>;

macro_rules! sales_columns {
    ($( $variant:ident => $field:ident, $display:literal; )*) => {
        /// One column of the sales table
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SalesColumn {
            $( $variant, )*
        }

        impl SalesColumn {
            /// Every column, in wire order
            pub const ALL: &'static [SalesColumn] = &[ $( SalesColumn::$variant, )* ];

            /// Column name in the source table
            pub fn display_name(self) -> &'static str {
                match self {
                    $( SalesColumn::$variant => $display, )*
                }
            }

            /// Key in the response schema
            pub fn field_name(self) -> &'static str {
                match self {
                    $( SalesColumn::$variant => stringify!($field), )*
                }
            }
        }

        /// One sales record in the response schema
        ///
        /// Values are passed through from storage verbatim; a column missing
        /// from the source row is `null`.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct SalesRecord {
            $( pub $field: Value, )*
        }

        impl SalesRecord {
            /// Map a raw storage row onto the response schema
            pub fn from_raw(row: &RawRow) -> Self {
                Self {
                    $( $field: row.get($display).cloned().unwrap_or(Value::Null), )*
                }
            }
        }
    };
}

sales_columns! {
    TransactionId => transaction_id, "Transaction ID";
    Date => date, "Date";
    CustomerId => customer_id, "Customer ID";
    CustomerName => customer_name, "Customer Name";
    PhoneNumber => phone_number, "Phone Number";
    Gender => gender, "Gender";
    Age => age, "Age";
    CustomerRegion => customer_region, "Customer Region";
    CustomerType => customer_type, "Customer Type";
    ProductId => product_id, "Product ID";
    ProductName => product_name, "Product Name";
    Brand => brand, "Brand";
    ProductCategory => product_category, "Product Category";
    Tags => tags, "Tags";
    Quantity => quantity, "Quantity";
    PricePerUnit => price_per_unit, "Price per Unit";
    DiscountPercentage => discount_percentage, "Discount Percentage";
    TotalAmount => total_amount, "Total Amount";
    FinalAmount => final_amount, "Final Amount";
    PaymentMethod => payment_method, "Payment Method";
    OrderStatus => order_status, "Order Status";
    DeliveryType => delivery_type, "Delivery Type";
    StoreId => store_id, "Store ID";
    StoreLocation => store_location, "Store Location";
    SalespersonId => salesperson_id, "Salesperson ID";
    EmployeeName => employee_name, "Employee Name";
}

impl SalesColumn {
    /// Bracket-quoted identifier for SQL text
    pub fn quoted(self) -> String {
        format!("[{}]", self.display_name())
    }
}
