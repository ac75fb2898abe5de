//! Fixture: a small organization seeded into an in-memory store.
//!
//! ```text
//! HQ (acme)
//! └── Central
//!     └── Riyadh      sara
//!                     omar (in Central)
//! Elsewhere (globex)  tariq
//! ```

use orgdesk::domain::{CustomField, OrganizationalUnit, User};
use orgdesk::{Document, DocumentsExt, InMemoryDocumentStore};

pub const COMPANY: &str = "acme";

pub struct Org {
    pub store: InMemoryDocumentStore,
    pub hq: OrganizationalUnit,
    pub central: OrganizationalUnit,
    pub riyadh: OrganizationalUnit,
    pub elsewhere: OrganizationalUnit,
    pub sara: User,
    pub omar: User,
    pub tariq: User,
}

impl Org {
    pub fn new() -> Self {
        let store = InMemoryDocumentStore::new();

        let hq = OrganizationalUnit::root("HQ").with_company(COMPANY);
        let central = OrganizationalUnit::child_of(&hq, "Central");
        let mut riyadh = OrganizationalUnit::child_of(&central, "Riyadh");
        riyadh.fields.push(CustomField::new("Region", "Central Riyadh"));
        let elsewhere = OrganizationalUnit::root("Elsewhere").with_company("globex");

        let mut sara = User::new("Sara", "sara@acme.test").in_ou(&riyadh);
        sara.created_at = 3_000;
        let mut omar = User::new("Omar", "omar@acme.test").in_ou(&central);
        omar.created_at = 2_000;
        let mut tariq = User::new("Tariq", "tariq@globex.test").in_ou(&elsewhere);
        tariq.created_at = 1_000;

        let org = Self {
            store,
            hq,
            central,
            riyadh,
            elsewhere,
            sara,
            omar,
            tariq,
        };
        for unit in [&org.hq, &org.central, &org.riyadh, &org.elsewhere] {
            org.insert(unit);
        }
        for user in [&org.sara, &org.omar, &org.tariq] {
            org.insert(user);
        }
        org
    }

    pub fn insert<D: Document>(&self, document: &D) {
        self.store.documents::<D>().insert(document).unwrap();
    }
}
