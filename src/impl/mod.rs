// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod repositories {
        pub(crate) mod in_memory;
        pub(crate) mod registry;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod applied_charge;
        pub(crate) mod charge_concept;
        pub(crate) mod credit_note;
        pub(crate) mod employee_balance_adjustment;
        pub(crate) mod employee_payable_item;
        pub(crate) mod employee_payment;
        pub(crate) mod exchange_rate;
        pub(crate) mod expense;
        pub(crate) mod ids;
        pub(crate) mod invoice;
        pub(crate) mod organization;
        pub(crate) mod payment;
        pub(crate) mod payroll_run;
        pub(crate) mod payslip;
        pub(crate) mod representative;
        pub(crate) mod salary_component;
        pub(crate) mod school_configuration;
        pub(crate) mod student;
    }
    pub(crate) mod logic {
        pub(crate) mod delinquency;
        pub(crate) mod payroll_math;
        pub(crate) mod scholarship;
    }
    pub(crate) mod repositories {
        pub(crate) mod payroll_repositories;
        pub(crate) mod school_repositories;
    }
    pub(crate) mod usecases {
        pub(crate) mod billing_engine;
        pub(crate) mod catalog_management;
        pub(crate) mod credit_reapplication;
        pub(crate) mod currency_service;
        pub(crate) mod invoicing;
        pub(crate) mod obligation_ledger;
        pub(crate) mod payment_engine;
        pub(crate) mod payroll_engine;
        pub(crate) mod reporting;
    }
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::applied_charge::*;
        pub use crate::domain::entities::charge_concept::*;
        pub use crate::domain::entities::credit_note::*;
        pub use crate::domain::entities::employee_balance_adjustment::*;
        pub use crate::domain::entities::employee_payable_item::*;
        pub use crate::domain::entities::employee_payment::*;
        pub use crate::domain::entities::exchange_rate::*;
        pub use crate::domain::entities::expense::*;
        pub use crate::domain::entities::ids::*;
        pub use crate::domain::entities::invoice::*;
        pub use crate::domain::entities::organization::*;
        pub use crate::domain::entities::payment::*;
        pub use crate::domain::entities::payroll_run::*;
        pub use crate::domain::entities::payslip::*;
        pub use crate::domain::entities::representative::*;
        pub use crate::domain::entities::salary_component::*;
        pub use crate::domain::entities::school_configuration::*;
        pub use crate::domain::entities::student::*;
    }

    pub mod repositories {
        pub use crate::data::repositories::registry::Repositories;
        pub use crate::domain::repositories::payroll_repositories::*;
        pub use crate::domain::repositories::school_repositories::*;
    }

    // Usecase modules stay organised by engine rather than flattened, since
    // several (billing_engine, payroll_engine, reporting) export more than one
    // operation plus their own request/result structs.
    pub mod usecases {
        pub use crate::domain::usecases::billing_engine;
        pub use crate::domain::usecases::catalog_management;
        pub use crate::domain::usecases::credit_reapplication;
        pub use crate::domain::usecases::currency_service;
        pub use crate::domain::usecases::invoicing;
        pub use crate::domain::usecases::obligation_ledger;
        pub use crate::domain::usecases::payment_engine;
        pub use crate::domain::usecases::payroll_engine;
        pub use crate::domain::usecases::reporting;
    }
}
