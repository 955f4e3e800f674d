use std::collections::HashMap;

use serde::Serialize;

use crate::models::Portal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub keywords: Vec<String>,
    pub path: String,
    pub description: String,
}

impl RouteEntry {
    pub fn new(keywords: &[&str], path: &str, description: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|kw| kw.to_lowercase()).collect(),
            path: path.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered keyword table for a single portal. Order matters: the first
/// matching entry wins.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    pub portal: Portal,
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(portal: Portal, routes: Vec<RouteEntry>) -> Self {
        Self { portal, routes }
    }

    pub fn for_portal(portal: Portal) -> Self {
        let routes = match portal {
            Portal::Hub => vec![
                RouteEntry::new(&["dashboard", "home", "overview"], "/hub/dashboard", "Hub dashboard"),
                RouteEntry::new(&["inventory", "stock", "storage", "warehouse"], "/hub/inventory", "Inventory"),
                RouteEntry::new(&["orders", "order", "incoming orders"], "/hub/orders", "Orders"),
                RouteEntry::new(&["farmers", "farmer network", "suppliers"], "/hub/farmers", "Farmer network"),
                RouteEntry::new(&["quality", "quality check", "inspection"], "/hub/quality", "Quality control"),
                RouteEntry::new(&["logistics", "dispatch", "shipments"], "/hub/logistics", "Logistics"),
                RouteEntry::new(&["reports", "analytics", "statistics"], "/hub/reports", "Reports"),
                RouteEntry::new(&["settings", "profile", "account"], "/hub/settings", "Settings"),
            ],
            Portal::Transport => vec![
                RouteEntry::new(&["dashboard", "home", "overview"], "/transport/dashboard", "Transport dashboard"),
                RouteEntry::new(&["routes", "route planning", "map"], "/transport/routes", "Route planning"),
                RouteEntry::new(&["vehicles", "fleet", "trucks"], "/transport/vehicles", "Fleet"),
                RouteEntry::new(&["deliveries", "delivery", "shipments"], "/transport/deliveries", "Deliveries"),
                RouteEntry::new(&["drivers", "staff"], "/transport/drivers", "Drivers"),
                RouteEntry::new(&["earnings", "payments", "revenue"], "/transport/earnings", "Earnings"),
                RouteEntry::new(&["maintenance", "service schedule"], "/transport/maintenance", "Maintenance"),
                RouteEntry::new(&["settings", "profile", "account"], "/transport/settings", "Settings"),
            ],
            Portal::Farmer => vec![
                RouteEntry::new(&["dashboard", "home", "overview"], "/farmer/dashboard", "Farmer dashboard"),
                RouteEntry::new(&["crops", "my crops", "produce", "harvest"], "/farmer/crops", "Crops"),
                RouteEntry::new(&["orders", "order"], "/farmer/orders", "Orders"),
                RouteEntry::new(&["marketplace", "market", "sell"], "/farmer/marketplace", "Marketplace"),
                RouteEntry::new(&["weather", "forecast"], "/farmer/weather", "Weather"),
                RouteEntry::new(&["payments", "earnings", "income"], "/farmer/payments", "Payments"),
                RouteEntry::new(&["analytics", "reports", "statistics"], "/farmer/analytics", "Analytics"),
                RouteEntry::new(&["settings", "profile", "account"], "/farmer/settings", "Settings"),
            ],
            Portal::Restaurant => vec![
                RouteEntry::new(&["dashboard", "home", "overview"], "/restaurant/dashboard", "Restaurant dashboard"),
                RouteEntry::new(&["browse", "produce", "suppliers", "marketplace"], "/restaurant/browse", "Browse produce"),
                RouteEntry::new(&["orders", "order"], "/restaurant/orders", "Orders"),
                RouteEntry::new(&["subscriptions", "recurring orders"], "/restaurant/subscriptions", "Subscriptions"),
                RouteEntry::new(&["payments", "invoices", "billing"], "/restaurant/payments", "Payments"),
                RouteEntry::new(&["settings", "profile", "account"], "/restaurant/settings", "Settings"),
            ],
            Portal::Retail => vec![
                RouteEntry::new(&["dashboard", "home", "overview"], "/retail/dashboard", "Retail dashboard"),
                RouteEntry::new(&["inventory", "stock", "shelves"], "/retail/inventory", "Inventory"),
                RouteEntry::new(&["orders", "order", "purchase orders"], "/retail/orders", "Orders"),
                RouteEntry::new(&["suppliers", "vendors"], "/retail/suppliers", "Suppliers"),
                RouteEntry::new(&["payments", "invoices", "billing"], "/retail/payments", "Payments"),
                RouteEntry::new(&["settings", "profile", "account"], "/retail/settings", "Settings"),
            ],
            Portal::Customer => vec![
                RouteEntry::new(&["dashboard", "home"], "/customer/dashboard", "Customer dashboard"),
                RouteEntry::new(&["shop", "marketplace", "products"], "/customer/shop", "Shop"),
                RouteEntry::new(&["cart", "basket", "checkout"], "/customer/cart", "Cart"),
                RouteEntry::new(&["orders", "my orders", "track order"], "/customer/orders", "Orders"),
                RouteEntry::new(&["favorites", "wishlist", "saved"], "/customer/favorites", "Favorites"),
                RouteEntry::new(&["profile", "account", "settings"], "/customer/profile", "Profile"),
            ],
            Portal::General => vec![
                RouteEntry::new(&["home", "main page", "start"], "/", "Home"),
                RouteEntry::new(&["marketplace", "market", "shop"], "/marketplace", "Marketplace"),
                RouteEntry::new(&["farmer dashboard", "farmer", "farm"], "/farmer/dashboard", "Farmer dashboard"),
                RouteEntry::new(&["hub dashboard", "hub"], "/hub/dashboard", "Hub dashboard"),
                RouteEntry::new(&["restaurant dashboard", "restaurant"], "/restaurant/dashboard", "Restaurant dashboard"),
                RouteEntry::new(&["retail dashboard", "retail", "store"], "/retail/dashboard", "Retail dashboard"),
                RouteEntry::new(&["transport dashboard", "transport", "logistics"], "/transport/dashboard", "Transport dashboard"),
                RouteEntry::new(&["customer dashboard", "customer"], "/customer/dashboard", "Customer dashboard"),
                RouteEntry::new(&["orders", "order"], "/orders", "Orders"),
                RouteEntry::new(&["login", "log in", "sign in"], "/login", "Login"),
                RouteEntry::new(&["register", "sign up", "create account"], "/register", "Registration"),
                RouteEntry::new(&["about", "about us"], "/about", "About"),
                RouteEntry::new(&["contact", "support", "contact us"], "/contact", "Contact"),
            ],
        };

        Self::new(portal, routes)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// All portal tables, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    tables: HashMap<Portal, RouteTable>,
}

impl RouteCatalog {
    pub fn builtin() -> Self {
        let tables = Portal::ALL
            .into_iter()
            .map(|portal| (portal, RouteTable::for_portal(portal)))
            .collect();
        Self { tables }
    }

    pub fn table(&self, portal: Portal) -> &RouteTable {
        // builtin() populates every portal
        &self.tables[&portal]
    }

    pub fn portals(&self) -> impl Iterator<Item = Portal> + '_ {
        Portal::ALL.into_iter().filter(|portal| self.tables.contains_key(portal))
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
