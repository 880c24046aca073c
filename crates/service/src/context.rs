use altruist_chain::MarketReader;
use altruist_database::{RecordStore, SafeDatabase};
use altruist_storage::ObjectStorage;

/// Everything an operation may talk to, created once at startup and shared by handlers.
pub trait Backend: Clone + Send + Sync + 'static {
    type Db: SafeDatabase;
    type Objects: ObjectStorage;
    type Market: MarketReader;

    fn records(&self) -> &RecordStore<Self::Db>;

    fn objects(&self) -> &Self::Objects;

    fn market(&self) -> &Self::Market;
}

#[derive(Clone)]
pub struct Context<D, S, M> {
    records: RecordStore<D>,
    objects: S,
    market: M,
}

impl<D: SafeDatabase, S, M> Context<D, S, M> {
    pub fn new(db: D, objects: S, market: M) -> Self {
        Self {
            records: RecordStore::new(db),
            objects,
            market,
        }
    }
}

impl<D, S, M> Backend for Context<D, S, M>
where
    D: SafeDatabase,
    S: ObjectStorage,
    M: MarketReader,
{
    type Db = D;
    type Objects = S;
    type Market = M;

    fn records(&self) -> &RecordStore<D> {
        &self.records
    }

    fn objects(&self) -> &S {
        &self.objects
    }

    fn market(&self) -> &M {
        &self.market
    }
}
