//! Table definitions, one struct of constants per table.

/// Constants and schema for the "customer_orders" table ("tab1").
pub struct CustomerOrderTable;

impl CustomerOrderTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "customer_orders";

    /// SQL statement for creating the customer orders table.
    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stt INTEGER NOT NULL,
                product_image TEXT,
                buyer_name TEXT NOT NULL,
                buyer_phone TEXT NOT NULL DEFAULT '',
                buyer_address TEXT NOT NULL DEFAULT '',
                order_code TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
                reported_amount INTEGER NOT NULL DEFAULT 0,
                deposit_amount INTEGER NOT NULL DEFAULT 0,
                shipping_fee INTEGER NOT NULL DEFAULT 0,
                domestic_shipping_fee INTEGER NOT NULL DEFAULT 0,
                remaining_amount INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'not_placed',
                priority TEXT NOT NULL DEFAULT 'normal',
                sync_id TEXT,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }

    pub fn create_indexes() -> Vec<String> {
        order_indexes(Self::TABLE_NAME)
    }
}

/// Constants and schema for the "shop_orders" table ("tab2").
pub struct ShopOrderTable;

impl ShopOrderTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "shop_orders";

    /// SQL statement for creating the shop orders table.
    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stt INTEGER NOT NULL,
                product_image TEXT,
                buyer_name TEXT NOT NULL,
                buyer_phone TEXT NOT NULL DEFAULT '',
                buyer_address TEXT NOT NULL DEFAULT '',
                order_code TEXT NOT NULL,
                reported_amount INTEGER NOT NULL DEFAULT 0,
                capital INTEGER NOT NULL DEFAULT 0,
                profit INTEGER NOT NULL DEFAULT 0,
                shipping_fee INTEGER NOT NULL DEFAULT 0,
                domestic_shipping_fee INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'not_placed',
                priority TEXT NOT NULL DEFAULT 'normal',
                sync_id TEXT,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }

    pub fn create_indexes() -> Vec<String> {
        order_indexes(Self::TABLE_NAME)
    }
}

fn order_indexes(table: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_sync_id
                ON {table} (sync_id) WHERE sync_id IS NOT NULL"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_order_code ON {table} (order_code)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table} (created_at)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{table}_status ON {table} (status)"),
    ]
}

/// Constants and schema for the "inventory" table.
pub struct InventoryTable;

impl InventoryTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "inventory";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                stt INTEGER NOT NULL,
                product_image TEXT,
                order_code TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
                capital INTEGER NOT NULL DEFAULT 0,
                reported_amount INTEGER NOT NULL DEFAULT 0,
                profit INTEGER NOT NULL DEFAULT 0,
                shipping_fee INTEGER NOT NULL DEFAULT 0,
                domestic_shipping_fee INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'in_stock',
                priority TEXT NOT NULL DEFAULT 'normal',
                note TEXT NOT NULL DEFAULT '',
                sync_id TEXT,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }

    pub fn create_indexes() -> Vec<String> {
        vec![format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{0}_sync_id
                ON {0} (sync_id) WHERE sync_id IS NOT NULL",
            Self::TABLE_NAME
        )]
    }
}

/// Constants and schema for the "customers" directory.
pub struct CustomerTable;

impl CustomerTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "customers";

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME
        )
    }

    pub fn create_indexes() -> Vec<String> {
        vec![
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{0}_phone ON {0} (phone)",
                Self::TABLE_NAME
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{0}_name ON {0} (name)",
                Self::TABLE_NAME
            ),
        ]
    }
}

/// Constants and schema for the "users" table.
///
/// Holds at most one row: the id is pinned to 1.
pub struct UserTable;

impl UserTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "users";

    /// The only id a user row may have.
    pub const SINGLETON_ID: i64 = 1;

    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY NOT NULL CHECK (id = {}),
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            Self::TABLE_NAME,
            Self::SINGLETON_ID
        )
    }
}
