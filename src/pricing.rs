//! Contract aggregation.
//!
//! Turns the selection list plus shared booking and customer data into a
//! priced, ordered [`ContractDocument`]. Everything here is pure: the result
//! depends only on the arguments and is recomputed from scratch on every
//! edit.

use rust_decimal::Decimal;

use crate::catalog;
use crate::model::{
    ContractDocument, CustomerData, EventDetails, LineItem, LineService, Selection, ServiceFields,
    ServiceInstance, ServiceKind, SharedBookingData,
};

/// Deposit used when the booking does not name one.
pub const DEFAULT_DEPOSIT: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// An instance after the shared booking fields have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedInstance {
    pub instance: ServiceInstance,
    pub event: Option<EventDetails>,
}

/// Copies the booking's date, guest count and location onto services that
/// show them. The instance's own notes are never touched.
pub fn merge_shared(instance: ServiceInstance, shared: &SharedBookingData) -> MergedInstance {
    let event = instance.kind().accepts_shared_fields().then(|| EventDetails {
        event_date: shared.event_date,
        guest_count: shared.guest_count,
        location: shared.location.clone(),
    });
    MergedInstance { instance, event }
}

/// Price of one instance: zero under a bundle unless it is the bundle, then
/// the entered override, then the catalog base price.
pub fn resolve_price(instance: &ServiceInstance, has_bundle: bool) -> Decimal {
    let kind = instance.kind();
    if has_bundle && kind != ServiceKind::Bundle {
        return Decimal::ZERO;
    }
    instance
        .price
        .unwrap_or_else(|| catalog::definition(kind).base_price())
}

/// Amount stored on the line. Add-ons carry their sub-item total instead of
/// a single price. An entered negative price is kept as is; [`priced_total`]
/// leaves it out.
pub fn resolve_amount(instance: &ServiceInstance, has_bundle: bool) -> Decimal {
    match &instance.fields {
        ServiceFields::Addon(_) if has_bundle => Decimal::ZERO,
        ServiceFields::Addon(addon) => addon.subtotal(),
        _ => resolve_price(instance, has_bundle),
    }
}

/// Sum of the positive line amounts, saturating at `Decimal::MAX`.
pub fn priced_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.effective_price)
        .filter(|amount| *amount > Decimal::ZERO)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Entered deposit, or the default when absent or zero.
pub fn resolve_deposit(shared: &SharedBookingData) -> Decimal {
    shared
        .deposit_amount
        .filter(|amount| !amount.is_zero())
        .unwrap_or(DEFAULT_DEPOSIT)
}

/// Travel fee, present only when strictly positive.
pub fn resolve_travel_fee(shared: &SharedBookingData) -> Option<Decimal> {
    shared.travel_fee.filter(|fee| *fee > Decimal::ZERO)
}

fn build_line_item(index: usize, selection: &Selection, shared: &SharedBookingData, has_bundle: bool) -> LineItem {
    match selection {
        Selection::Service(instance) => {
            let effective_price = resolve_amount(instance, has_bundle);
            let MergedInstance { instance, event } = merge_shared(instance.clone(), shared);
            LineItem {
                selection_index: index,
                service: LineService::Known(instance.fields),
                event,
                effective_price,
                notes: instance.notes,
            }
        }
        Selection::Unknown { id } => {
            tracing::warn!(index, id = id.as_str(), "unknown service kept as placeholder, not priced");
            LineItem {
                selection_index: index,
                service: LineService::Unknown { unknown_id: id.clone() },
                event: None,
                effective_price: Decimal::ZERO,
                notes: None,
            }
        }
    }
}

/// Moves bundle lines to the front; everything else keeps its order.
pub fn bundle_first(items: &mut [LineItem]) {
    items.sort_by_key(|item| !item.is_bundle());
}

pub fn generate_contract(
    selections: &[Selection],
    shared: &SharedBookingData,
    customer: &CustomerData,
) -> ContractDocument {
    let has_bundle = selections
        .iter()
        .any(|s| matches!(s, Selection::Service(i) if i.kind() == ServiceKind::Bundle));
    if has_bundle {
        tracing::debug!("bundle selected, other services priced at zero");
    }

    let mut line_items: Vec<LineItem> = selections
        .iter()
        .enumerate()
        .map(|(index, selection)| build_line_item(index, selection, shared, has_bundle))
        .collect();
    bundle_first(&mut line_items);

    let travel_fee = resolve_travel_fee(shared);
    let total_amount = priced_total(&line_items).saturating_add(travel_fee.unwrap_or_default());

    tracing::debug!(
        lines = line_items.len(),
        total = %total_amount,
        "contract aggregated"
    );

    ContractDocument {
        line_items,
        total_amount,
        customer_name: customer.customer_name.clone().unwrap_or_default(),
        customer_phone: customer.customer_phone.clone().unwrap_or_default(),
        customer_email: customer.customer_email.clone().unwrap_or_default(),
        groom_name: customer.groom_name.clone().unwrap_or_default(),
        bride_name: customer.bride_name.clone().unwrap_or_default(),
        notes: shared.notes.clone().unwrap_or_default(),
        deposit_amount: resolve_deposit(shared),
        travel_fee,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AddonFields;
    use proptest::prelude::*;

    fn service(kind: ServiceKind) -> ServiceInstance {
        ServiceInstance::new(ServiceFields::empty(kind))
    }

    fn selected(instances: Vec<ServiceInstance>) -> Vec<Selection> {
        instances.into_iter().map(Selection::Service).collect()
    }

    fn shared_with_fee(fee: i64) -> SharedBookingData {
        SharedBookingData {
            travel_fee: Some(Decimal::from(fee)),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_photobooth_with_travel_fee() {
        let doc = generate_contract(
            &selected(vec![service(ServiceKind::Photobooth)]),
            &shared_with_fee(500),
            &CustomerData::default(),
        );
        assert_eq!(doc.line_items.len(), 1);
        assert_eq!(doc.line_items[0].effective_price, Decimal::from(8900));
        assert_eq!(doc.total_amount, Decimal::from(9400));
        assert_eq!(doc.travel_fee, Some(Decimal::from(500)));
    }

    #[test]
    fn test_bundle_zeroes_other_services() {
        let doc = generate_contract(
            &selected(vec![
                service(ServiceKind::Photobooth),
                service(ServiceKind::Bundle).with_price(Decimal::from(15000)),
            ]),
            &SharedBookingData::default(),
            &CustomerData::default(),
        );
        let priced: Vec<_> = doc
            .line_items
            .iter()
            .filter(|item| item.effective_price > Decimal::ZERO)
            .collect();
        assert_eq!(priced.len(), 1);
        assert!(priced[0].is_bundle());
        assert_eq!(priced[0].effective_price, Decimal::from(15000));
        assert_eq!(doc.total_amount, Decimal::from(15000));
        assert_eq!(doc.travel_fee, None);
    }

    #[test]
    fn test_bundle_moves_to_front() {
        let doc = generate_contract(
            &selected(vec![
                service(ServiceKind::Photobooth),
                service(ServiceKind::Stickerline),
                service(ServiceKind::Bundle),
            ]),
            &SharedBookingData::default(),
            &CustomerData::default(),
        );
        let order: Vec<_> = doc.line_items.iter().map(|i| i.selection_index).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_addon_sums_present_sub_prices() {
        let addon = ServiceInstance::new(ServiceFields::Addon(AddonFields {
            addon1: Some("Extra prints".into()),
            addon_price1: Some(Decimal::from(500)),
            addon3: Some("Guest book".into()),
            addon_price3: Some(Decimal::from(300)),
            ..Default::default()
        }));
        let doc = generate_contract(&selected(vec![addon]), &SharedBookingData::default(), &CustomerData::default());
        assert_eq!(doc.line_items[0].effective_price, Decimal::from(800));
        assert_eq!(doc.total_amount, Decimal::from(800));
    }

    #[test]
    fn test_addon_zeroed_under_bundle() {
        let addon = ServiceInstance::new(ServiceFields::Addon(AddonFields {
            addon_price1: Some(Decimal::from(500)),
            ..Default::default()
        }));
        let bundle = service(ServiceKind::Bundle).with_price(Decimal::from(20000));
        let doc = generate_contract(&selected(vec![addon, bundle]), &SharedBookingData::default(), &CustomerData::default());
        assert_eq!(doc.total_amount, Decimal::from(20000));
    }

    #[test]
    fn test_price_override_beats_base_price() {
        let instance = service(ServiceKind::Video360).with_price(Decimal::from(9900));
        assert_eq!(resolve_price(&instance, false), Decimal::from(9900));
        assert_eq!(resolve_price(&service(ServiceKind::Video360), false), Decimal::from(10900));
        assert_eq!(resolve_price(&instance, true), Decimal::ZERO);
    }

    #[test]
    fn test_negative_price_kept_on_line_but_not_totalled() {
        let instance = service(ServiceKind::Blessing).with_price(Decimal::from(-100));
        assert_eq!(resolve_amount(&instance, false), Decimal::from(-100));

        let doc = generate_contract(
            &selected(vec![instance, service(ServiceKind::Stickerline)]),
            &SharedBookingData::default(),
            &CustomerData::default(),
        );
        assert_eq!(doc.line_items[0].effective_price, Decimal::from(-100));
        assert_eq!(doc.total_amount, Decimal::from(1200));
    }

    #[test]
    fn test_huge_prices_saturate_instead_of_overflowing() {
        let huge = Decimal::MAX;
        let doc = generate_contract(
            &selected(vec![
                service(ServiceKind::Photobooth).with_price(huge),
                service(ServiceKind::Photobooth).with_price(huge),
            ]),
            &shared_with_fee(500),
            &CustomerData::default(),
        );
        assert_eq!(doc.total_amount, Decimal::MAX);
        assert_eq!(doc.balance_due(), Decimal::MAX - DEFAULT_DEPOSIT);
    }

    #[test]
    fn test_shared_fields_merged_only_where_accepted() {
        let shared = SharedBookingData {
            location: Some("Riverside Hall".into()),
            guest_count: Some(150),
            ..Default::default()
        };
        let merged = merge_shared(service(ServiceKind::Horoscope), &shared);
        let event = merged.event.unwrap();
        assert_eq!(event.location.as_deref(), Some("Riverside Hall"));
        assert_eq!(event.guest_count, Some(150));

        assert!(merge_shared(service(ServiceKind::Bundle), &shared).event.is_none());
        assert!(merge_shared(service(ServiceKind::Addon), &shared).event.is_none());
    }

    #[test]
    fn test_shared_notes_do_not_replace_service_notes() {
        let shared = SharedBookingData {
            notes: Some("Parking at rear entrance".into()),
            ..Default::default()
        };
        let doc = generate_contract(
            &selected(vec![
                service(ServiceKind::Photobooth).with_notes("Pink backdrop"),
                service(ServiceKind::Stickerline),
            ]),
            &shared,
            &CustomerData::default(),
        );
        assert_eq!(doc.line_items[0].notes.as_deref(), Some("Pink backdrop"));
        assert_eq!(doc.line_items[1].notes, None);
        assert_eq!(doc.notes, "Parking at rear entrance");
    }

    #[test]
    fn test_unknown_service_is_placeholder() {
        let selections = vec![
            Selection::Unknown { id: "fireworks".into() },
            Selection::Service(service(ServiceKind::Stickerline)),
        ];
        let doc = generate_contract(&selections, &SharedBookingData::default(), &CustomerData::default());
        assert_eq!(doc.line_items.len(), 2);
        assert_eq!(doc.line_items[0].title(), catalog::UNKNOWN_SERVICE_LABEL);
        assert_eq!(doc.line_items[0].effective_price, Decimal::ZERO);
        assert_eq!(doc.total_amount, Decimal::from(1200));
    }

    #[test]
    fn test_passthrough_defaults() {
        let doc = generate_contract(&[], &SharedBookingData::default(), &CustomerData::default());
        assert_eq!(doc.customer_name, "");
        assert_eq!(doc.bride_name, "");
        assert_eq!(doc.notes, "");
        assert_eq!(doc.deposit_amount, Decimal::from(3000));
        assert_eq!(doc.travel_fee, None);
        assert_eq!(doc.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_deposit_and_travel_fee_resolution() {
        let mut shared = SharedBookingData {
            deposit_amount: Some(Decimal::from(5000)),
            travel_fee: Some(Decimal::from(-200)),
            ..Default::default()
        };
        assert_eq!(resolve_deposit(&shared), Decimal::from(5000));
        assert_eq!(resolve_travel_fee(&shared), None);

        shared.deposit_amount = Some(Decimal::ZERO);
        shared.travel_fee = Some(Decimal::ZERO);
        assert_eq!(resolve_deposit(&shared), DEFAULT_DEPOSIT);
        assert_eq!(resolve_travel_fee(&shared), None);
    }

    fn kind_strategy() -> impl Strategy<Value = ServiceKind> {
        prop::sample::select(ServiceKind::ALL.to_vec())
    }

    fn instance_strategy() -> impl Strategy<Value = ServiceInstance> {
        (kind_strategy(), prop::option::of(0i64..50_000), prop::option::of(0i64..5_000)).prop_map(
            |(kind, price, addon_price)| {
                let fields = match kind {
                    ServiceKind::Addon => ServiceFields::Addon(AddonFields {
                        addon_price2: addon_price.map(Decimal::from),
                        ..Default::default()
                    }),
                    other => ServiceFields::empty(other),
                };
                let instance = ServiceInstance::new(fields);
                match price {
                    Some(p) => instance.with_price(Decimal::from(p)),
                    None => instance,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_bundle_total_is_bundle_prices_plus_fee(
            instances in prop::collection::vec(instance_strategy(), 0..8),
            bundle_price in 0i64..50_000,
            fee in -1_000i64..2_000,
        ) {
            let mut all = instances;
            all.push(service(ServiceKind::Bundle).with_price(Decimal::from(bundle_price)));
            let doc = generate_contract(&selected(all.clone()), &shared_with_fee(fee), &CustomerData::default());

            let bundle_sum: Decimal = all
                .iter()
                .filter(|i| i.kind() == ServiceKind::Bundle)
                .map(|i| resolve_price(i, true).max(Decimal::ZERO))
                .sum();
            let fee = Decimal::from(fee.max(0));
            prop_assert_eq!(doc.total_amount, bundle_sum + fee);
            for item in doc.line_items.iter().filter(|i| !i.is_bundle()) {
                prop_assert_eq!(item.effective_price, Decimal::ZERO);
            }
        }

        #[test]
        fn prop_total_without_bundle_sums_resolved_prices(
            instances in prop::collection::vec(instance_strategy(), 0..8),
            fee in -1_000i64..2_000,
        ) {
            let instances: Vec<_> = instances.into_iter().filter(|i| i.kind() != ServiceKind::Bundle).collect();
            let doc = generate_contract(&selected(instances.clone()), &shared_with_fee(fee), &CustomerData::default());

            let expected: Decimal = instances.iter().map(|i| resolve_amount(i, false)).sum::<Decimal>()
                + Decimal::from(fee.max(0));
            prop_assert_eq!(doc.total_amount, expected);
        }

        #[test]
        fn prop_ordering_is_stable_and_idempotent(
            instances in prop::collection::vec(instance_strategy(), 0..10),
        ) {
            let doc = generate_contract(&selected(instances), &SharedBookingData::default(), &CustomerData::default());
            let items = doc.line_items;

            let first_non_bundle = items.iter().position(|i| !i.is_bundle()).unwrap_or(items.len());
            prop_assert!(items[first_non_bundle..].iter().all(|i| !i.is_bundle()));

            let indices: Vec<_> = items[first_non_bundle..].iter().map(|i| i.selection_index).collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&indices, &sorted);

            let mut resorted = items.clone();
            bundle_first(&mut resorted);
            prop_assert_eq!(resorted, items);
        }

        #[test]
        fn prop_service_notes_survive_shared_notes(
            kind in kind_strategy(),
            own in prop::option::of("[a-z]{1,12}"),
            booking in "[A-Z]{1,12}",
        ) {
            let mut instance = service(kind);
            instance.notes = own.clone();
            let shared = SharedBookingData { notes: Some(booking.clone()), ..Default::default() };
            let doc = generate_contract(&selected(vec![instance]), &shared, &CustomerData::default());
            prop_assert_eq!(&doc.line_items[0].notes, &own);
            prop_assert_eq!(doc.notes, booking);
        }
    }
}
