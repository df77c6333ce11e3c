use chrono::{NaiveDate, Utc};
use fractic_server_error::ServerError;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::data::repositories::registry::Repositories;
use crate::domain::entities::credit_note::CreditNote;
use crate::domain::entities::ids::{AppliedChargeId, InvoiceId, RepresentativeId};
use crate::domain::entities::invoice::{EmissionType, Invoice, InvoiceItem, InvoiceStatus};
use crate::errors::{
    AppliedChargeAlreadyInvoiced, AppliedChargeHasNoConcept, AppliedChargeNotOwnedByRepresentative,
    DuplicateFiscalControlNumber, DuplicateFiscalInvoiceNumber, DuplicateManualControlNumber,
    EmptyChargeSelection, InvoiceAlreadyAnnulled, InvoiceAlreadyHasCreditNote,
    MissingBillToAddress, MissingManualControlNumber,
};
use crate::money::round2;

pub struct BillToOverrides {
    pub representative_name: Option<String>,
    pub representative_identification: Option<String>,
    pub representative_address: Option<String>,
}

/// §4.7 `create_invoice`.
#[tracing::instrument(skip(repos, overrides))]
pub async fn create_invoice(
    repos: &Repositories,
    representative_id: RepresentativeId,
    applied_charge_ids: Vec<AppliedChargeId>,
    emission_type: EmissionType,
    issue_date: NaiveDate,
    manual_control_number: Option<String>,
    overrides: Option<BillToOverrides>,
) -> Result<Invoice, ServerError> {
    if applied_charge_ids.is_empty() {
        return Err(EmptyChargeSelection::new());
    }
    let representative = repos.representatives.get(representative_id).await?;

    let mut charges = Vec::with_capacity(applied_charge_ids.len());
    for charge_id in &applied_charge_ids {
        let charge = repos.applied_charges.get(*charge_id).await?;
        let student = repos.students.get(charge.student_id).await?;
        if student.representative_id != representative_id {
            return Err(AppliedChargeNotOwnedByRepresentative::new(&charge.id, &representative_id));
        }
        if charge.invoice_id.is_some() {
            return Err(AppliedChargeAlreadyInvoiced::new(&charge.id));
        }
        if charge.status == crate::domain::entities::applied_charge::ChargeStatus::Cancelled {
            return Err(AppliedChargeAlreadyInvoiced::new(&charge.id));
        }
        if charge.charge_concept_id.is_none() {
            return Err(AppliedChargeHasNoConcept::new(&charge.id));
        }
        charges.push(charge);
    }

    let bill_to_address = overrides
        .as_ref()
        .and_then(|o| o.representative_address.clone())
        .or_else(|| representative.address.clone())
        .ok_or_else(MissingBillToAddress::new)?;
    let bill_to_name = overrides
        .as_ref()
        .and_then(|o| o.representative_name.clone())
        .unwrap_or_else(|| representative.full_name());
    let bill_to_identification = overrides
        .as_ref()
        .and_then(|o| o.representative_identification.clone())
        .unwrap_or_else(|| representative.identification.number.clone());

    let config = repos.store.get_school_configuration().await;
    let invoice_number = repos.store.draw_invoice_number().await?;

    let mut items = Vec::with_capacity(charges.len());
    let mut subtotal_ves = Decimal::ZERO;
    let mut total_iva_ves = Decimal::ZERO;
    for charge in &charges {
        let concept_id = charge.charge_concept_id.expect("checked above");
        let concept = repos.charge_concepts.get(concept_id).await?;
        let unit_price = charge.amount_due_ves_at_emission;
        let item_subtotal = round2(unit_price);
        let item_iva = round2(item_subtotal * concept.iva_percentage);
        let item_total = round2(item_subtotal + item_iva);
        subtotal_ves += item_subtotal;
        total_iva_ves += item_iva;
        items.push(InvoiceItem {
            applied_charge_id: charge.id,
            charge_concept_id: Some(concept_id),
            description: charge.description.clone(),
            quantity: 1,
            unit_price_ves: unit_price,
            iva_percentage: concept.iva_percentage,
            item_subtotal,
            item_iva,
            item_total,
        });
    }
    let total_amount_ves = round2(subtotal_ves + total_iva_ves);

    let (fiscal_invoice_number, fiscal_control_number, fiscal_emission_url, manual_control_number) =
        match emission_type {
            EmissionType::FormaLibre => {
                let manual = manual_control_number.ok_or_else(MissingManualControlNumber::new)?;
                (Some(invoice_number.clone()), Some(manual.clone()), None, Some(manual))
            }
            EmissionType::Digital => (
                Some(format!("DIG-{}", Uuid::new_v4())),
                Some(format!("DIG-CTRL-{}", Uuid::new_v4())),
                Some(format!("https://fiscal.example/invoices/{}", Uuid::new_v4())),
                None,
            ),
            EmissionType::FiscalPrinter => (
                Some(format!("FP-{}", Uuid::new_v4())),
                Some(format!("FP-CTRL-{}", Uuid::new_v4())),
                None,
                None,
            ),
        };

    // §4.7 step 5 / §6: manual_control_number, fiscal_invoice_number, and
    // fiscal_control_number are each globally unique among non-annulled
    // invoices.
    let existing_invoices = repos.invoices.list().await?;
    if let Some(manual) = &manual_control_number {
        if existing_invoices
            .iter()
            .any(|inv| inv.status != InvoiceStatus::Annulled && inv.manual_control_number.as_deref() == Some(manual.as_str()))
        {
            return Err(DuplicateManualControlNumber::new(manual));
        }
    }
    if let Some(fiscal_invoice) = &fiscal_invoice_number {
        if existing_invoices.iter().any(|inv| {
            inv.status != InvoiceStatus::Annulled && inv.fiscal_invoice_number.as_deref() == Some(fiscal_invoice.as_str())
        }) {
            return Err(DuplicateFiscalInvoiceNumber::new(fiscal_invoice));
        }
    }
    if let Some(fiscal_control) = &fiscal_control_number {
        if existing_invoices.iter().any(|inv| {
            inv.status != InvoiceStatus::Annulled && inv.fiscal_control_number.as_deref() == Some(fiscal_control.as_str())
        }) {
            return Err(DuplicateFiscalControlNumber::new(fiscal_control));
        }
    }

    let invoice = Invoice {
        id: Uuid::new_v4(),
        invoice_number,
        representative_id,
        issue_date,
        school_name_snapshot: config.school_name,
        school_rif_snapshot: config.school_rif,
        school_address_snapshot: config.school_address,
        representative_name_snapshot: bill_to_name,
        representative_identification_snapshot: bill_to_identification,
        representative_address_snapshot: bill_to_address,
        items,
        subtotal_ves,
        total_iva_ves,
        total_amount_ves,
        emission_type,
        status: InvoiceStatus::Emitted,
        manual_control_number,
        fiscal_invoice_number,
        fiscal_control_number,
        fiscal_emission_url,
        credit_note_id: None,
        notes: None,
    };
    repos.invoices.save(invoice.clone()).await?;

    for mut charge in charges {
        charge.invoice_id = Some(invoice.id);
        repos.applied_charges.save(charge).await?;
    }

    tracing::info!(invoice_id = %invoice.id, number = %invoice.invoice_number, "invoice emitted");
    Ok(invoice)
}

/// §4.7 `annul_invoice`.
#[tracing::instrument(skip(repos))]
pub async fn annul_invoice(repos: &Repositories, invoice_id: InvoiceId, reason: Option<String>, today: NaiveDate) -> Result<Invoice, ServerError> {
    let mut invoice = repos.invoices.get(invoice_id).await?;
    if invoice.status == InvoiceStatus::Annulled {
        return Err(InvoiceAlreadyAnnulled::new(&invoice_id));
    }

    for item in &invoice.items {
        if let Ok(mut charge) = repos.applied_charges.get(item.applied_charge_id).await {
            charge.invoice_id = None;
            repos.applied_charges.save(charge).await?;
        }
    }

    invoice.status = InvoiceStatus::Annulled;
    if let Some(reason) = reason {
        let line = format!("[{}] annulled: {}", today, reason);
        invoice.notes = Some(match invoice.notes.take() {
            Some(existing) => format!("{}\n{}", line, existing),
            None => line,
        });
    }
    repos.invoices.save(invoice.clone()).await?;
    tracing::info!(invoice_id = %invoice_id, "invoice annulled");
    Ok(invoice)
}

/// §4.7 `create_credit_note`.
#[tracing::instrument(skip(repos))]
pub async fn create_credit_note(
    repos: &Repositories,
    invoice_id: InvoiceId,
    issue_date: NaiveDate,
    reason: String,
) -> Result<CreditNote, ServerError> {
    let invoice = repos.invoices.get(invoice_id).await?;
    if invoice.status == InvoiceStatus::Annulled {
        return Err(InvoiceAlreadyAnnulled::new(&invoice_id));
    }
    if invoice.credit_note_id.is_some() {
        return Err(InvoiceAlreadyHasCreditNote::new(&invoice_id));
    }

    let credit_note_number = repos.store.draw_credit_note_number().await?;
    let credit_note = CreditNote {
        id: Uuid::new_v4(),
        credit_note_number,
        invoice_id,
        issue_date,
        reason: reason.clone(),
        items: invoice.items.clone(),
        total_credited_ves: invoice.total_amount_ves,
    };
    repos.credit_notes.save(credit_note.clone()).await?;

    let mut annulled = annul_invoice(repos, invoice_id, Some(reason), issue_date).await?;
    annulled.credit_note_id = Some(credit_note.id);
    repos.invoices.save(annulled).await?;

    repos
        .store
        .add_representative_credit(invoice.representative_id, credit_note.total_credited_ves)
        .await?;

    tracing::info!(credit_note_id = %credit_note.id, invoice_id = %invoice_id, "credit note issued");
    Ok(credit_note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::applied_charge::ChargeStatus;
    use crate::domain::entities::charge_concept::{ChargeConcept, ChargeFrequency};
    use crate::domain::entities::representative::{Identification, IdentificationType, Representative};
    use crate::domain::entities::school_configuration::SchoolConfiguration;
    use crate::domain::entities::student::{GradeLevel, Student};
    use crate::domain::usecases::obligation_ledger::issue_charge;
    use crate::money::Currency;
    use rust_decimal_macros::dec;

    fn fresh_repos() -> Repositories {
        Repositories::in_memory(SchoolConfiguration {
            school_name: "Colegio Test".into(),
            school_rif: "J-00000000-0".into(),
            school_address: "Caracas".into(),
            invoice_number_prefix: "INV-".into(),
            next_internal_invoice_reference: 1,
            credit_note_number_prefix: "CN-".into(),
            next_credit_note_reference: 1,
            default_iva_percentage: dec!(0.16),
            payment_due_day: Some(5),
        })
    }

    async fn seed_charge(repos: &Repositories) -> (RepresentativeId, AppliedChargeId) {
        let rep = Representative {
            id: Uuid::new_v4(),
            first_name: "Carla".into(),
            last_name: "Rojas".into(),
            identification: Identification { id_type: IdentificationType::V, number: "9999".into() },
            email: "carla@example.com".into(),
            phones: vec![],
            address: Some("Av. Bolivar".into()),
            rif: Some("J-11111111-1".into()),
            available_credit_ves: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repos.representatives.save(rep.clone()).await.unwrap();
        let grade = GradeLevel { id: Uuid::new_v4(), name: "3ro".into(), order_index: 3, is_active: true };
        repos.grade_levels.save(grade.clone()).await.unwrap();
        let student = Student {
            id: Uuid::new_v4(),
            first_name: "Tomas".into(),
            last_name: "Rojas".into(),
            identity: None,
            birth_date: None,
            grade_level_id: grade.id,
            representative_id: rep.id,
            is_active: true,
            has_scholarship: false,
            scholarship_percentage: Decimal::ZERO,
            scholarship_fixed_amount_ves: Decimal::ZERO,
        };
        repos.students.save(student.clone()).await.unwrap();
        let concept = ChargeConcept {
            id: Uuid::new_v4(),
            name: "Mensualidad".into(),
            default_amount: dec!(1000.00),
            default_amount_currency: Currency::Ves,
            default_frequency: ChargeFrequency::Monthly,
            category: "tuition".into(),
            iva_percentage: dec!(0.16),
            applicable_grade_level: None,
            is_active: true,
        };
        repos.charge_concepts.save(concept.clone()).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let charge = issue_charge(repos, student.id, concept.id, "June".into(), today, today, ChargeStatus::Pending)
            .await
            .unwrap();
        (rep.id, charge.id)
    }

    #[tokio::test]
    async fn invoice_totals_include_iva() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_charge(&repos).await;
        let invoice = create_invoice(
            &repos,
            rep_id,
            vec![charge_id],
            EmissionType::FormaLibre,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Some("0001".into()),
            None,
        )
        .await
        .unwrap();
        assert_eq!(invoice.subtotal_ves, dec!(1000.00));
        assert_eq!(invoice.total_iva_ves, dec!(160.00));
        assert_eq!(invoice.total_amount_ves, dec!(1160.00));
        assert_eq!(invoice.invoice_number, "INV-1");
    }

    #[tokio::test]
    async fn credit_note_annuls_invoice_and_grows_credit() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_charge(&repos).await;
        let invoice = create_invoice(
            &repos,
            rep_id,
            vec![charge_id],
            EmissionType::Digital,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            None,
            None,
        )
        .await
        .unwrap();

        let credit_note = create_credit_note(
            &repos,
            invoice.id,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            "billing error".into(),
        )
        .await
        .unwrap();

        let updated_invoice = repos.invoices.get(invoice.id).await.unwrap();
        assert_eq!(updated_invoice.status, InvoiceStatus::Annulled);
        assert_eq!(updated_invoice.credit_note_id, Some(credit_note.id));

        let rep = repos.representatives.get(rep_id).await.unwrap();
        assert_eq!(rep.available_credit_ves, dec!(1160.00));
    }

    #[tokio::test]
    async fn duplicate_manual_control_number_is_rejected() {
        let repos = fresh_repos();
        let (rep_id_a, charge_id_a) = seed_charge(&repos).await;
        let (rep_id_b, charge_id_b) = seed_charge(&repos).await;
        create_invoice(
            &repos,
            rep_id_a,
            vec![charge_id_a],
            EmissionType::FormaLibre,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Some("0001".into()),
            None,
        )
        .await
        .unwrap();

        let err = create_invoice(
            &repos,
            rep_id_b,
            vec![charge_id_b],
            EmissionType::FormaLibre,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            Some("0001".into()),
            None,
        )
        .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn second_annulment_is_rejected() {
        let repos = fresh_repos();
        let (rep_id, charge_id) = seed_charge(&repos).await;
        let invoice = create_invoice(
            &repos,
            rep_id,
            vec![charge_id],
            EmissionType::Digital,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            None,
            None,
        )
        .await
        .unwrap();
        annul_invoice(&repos, invoice.id, None, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).await.unwrap();
        let err = annul_invoice(&repos, invoice.id, None, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()).await;
        assert!(err.is_err());
    }
}
