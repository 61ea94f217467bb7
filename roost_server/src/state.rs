use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;

use roost_gateway::Gateway;

pub type DatabasePool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub gateway: Gateway,
}
