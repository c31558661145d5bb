use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxMediaRepo {
    pub pool: PgPool,
}
