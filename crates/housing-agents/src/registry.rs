//! Arena of houses and households.
//!
//! Both agent kinds live in id-ordered maps; every link between them is an
//! id. All operations that touch both sides of an ownership link (initial
//! assignment, purchase, release on death) go through this type so the two
//! sides never disagree.

use std::collections::BTreeMap;

use housing_types::{HouseId, HouseQuality, HouseholdId, Position};

use crate::error::AgentError;
use crate::grid::Grid;
use crate::house::House;
use crate::household::Household;

/// Outcome of a completed purchase, before rounding into the sale ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    /// The house that changed hands.
    pub house: HouseId,
    /// New owner.
    pub buyer: HouseholdId,
    /// Previous owner, if the house had one.
    pub seller: Option<HouseholdId>,
    /// Transaction price.
    pub price: f64,
    /// Mortgage taken by the buyer.
    pub buyer_mortgage: f64,
    /// Part of the price paid from the buyer's savings.
    pub buyer_outlay: f64,
    /// Net amount credited to the seller's savings.
    pub seller_proceeds: f64,
    /// Seller mortgage repaid out of the price.
    pub seller_mortgage_settled: f64,
}

/// Id-indexed tables of both agent kinds plus the grid.
#[derive(Debug, Clone)]
pub struct Registry {
    houses: BTreeMap<HouseId, House>,
    households: BTreeMap<HouseholdId, Household>,
    grid: Grid,
    next_house: HouseId,
    next_household: HouseholdId,
}

impl Registry {
    /// Empty registry over `grid`. Ids start at 1.
    pub const fn new(grid: Grid) -> Self {
        Self {
            houses: BTreeMap::new(),
            households: BTreeMap::new(),
            grid,
            next_house: HouseId::new(1),
            next_household: HouseholdId::new(1),
        }
    }

    // -----------------------------------------------------------------------
    // Creation and lookup
    // -----------------------------------------------------------------------

    /// Build a house with a fresh id and place it on the grid.
    pub fn add_house(
        &mut self,
        position: Position,
        price: f64,
        drift: f64,
        quality: HouseQuality,
    ) -> HouseId {
        let id = self.next_house;
        self.next_house = id.next();
        self.grid.place_house(id, position);
        self.houses
            .insert(id, House::new(id, position, price, drift, quality));
        id
    }

    /// Build a household with a fresh id.
    pub fn add_household(&mut self, build: impl FnOnce(HouseholdId) -> Household) -> HouseholdId {
        let id = self.next_household;
        self.next_household = id.next();
        self.households.insert(id, build(id));
        id
    }

    /// The market grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Look up a house.
    pub fn house(&self, id: HouseId) -> Result<&House, AgentError> {
        self.houses.get(&id).ok_or(AgentError::HouseNotFound(id))
    }

    /// Look up a house mutably.
    pub fn house_mut(&mut self, id: HouseId) -> Result<&mut House, AgentError> {
        self.houses.get_mut(&id).ok_or(AgentError::HouseNotFound(id))
    }

    /// Look up a household.
    pub fn household(&self, id: HouseholdId) -> Result<&Household, AgentError> {
        self.households
            .get(&id)
            .ok_or(AgentError::HouseholdNotFound(id))
    }

    /// Look up a household mutably.
    pub fn household_mut(&mut self, id: HouseholdId) -> Result<&mut Household, AgentError> {
        self.households
            .get_mut(&id)
            .ok_or(AgentError::HouseholdNotFound(id))
    }

    /// Whether the household is still alive.
    pub fn contains_household(&self, id: HouseholdId) -> bool {
        self.households.contains_key(&id)
    }

    /// All houses in id order.
    pub fn houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    /// All households in id order.
    pub fn households(&self) -> impl Iterator<Item = &Household> {
        self.households.values()
    }

    /// Mutable access to every house, in id order.
    pub fn houses_mut(&mut self) -> impl Iterator<Item = &mut House> {
        self.houses.values_mut()
    }

    /// House ids in id order.
    pub fn house_ids(&self) -> Vec<HouseId> {
        self.houses.keys().copied().collect()
    }

    /// Household ids in id order.
    pub fn household_ids(&self) -> Vec<HouseholdId> {
        self.households.keys().copied().collect()
    }

    /// Number of houses.
    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    /// Number of living households.
    pub fn household_count(&self) -> usize {
        self.households.len()
    }

    // -----------------------------------------------------------------------
    // Market views
    // -----------------------------------------------------------------------

    /// Houses currently on the market, in id order.
    ///
    /// Recomputed on every call, so purchases made earlier in a pass are
    /// visible to later households.
    pub fn available_houses(&self) -> Vec<HouseId> {
        self.houses
            .values()
            .filter(|h| h.available)
            .map(|h| h.id)
            .collect()
    }

    /// Whether the Moore neighborhood of `cell` counts as empty: no houses
    /// at all, or an available share above `threshold`.
    pub fn neighborhood_is_empty(&self, cell: Position, threshold: f64) -> bool {
        let neighbors = self.grid.neighbor_houses(cell);
        if neighbors.is_empty() {
            return true;
        }
        let available = neighbors
            .iter()
            .filter(|id| self.houses.get(id).is_some_and(|h| h.available))
            .count();
        available as f64 / neighbors.len() as f64 > threshold
    }

    // -----------------------------------------------------------------------
    // Ownership changes
    // -----------------------------------------------------------------------

    /// Give an unowned house to a household at setup.
    ///
    /// The house leaves the market and the household moves onto its cell.
    pub fn assign_initial(&mut self, house: HouseId, household: HouseholdId) -> Result<(), AgentError> {
        let home = self.house(house)?;
        if home.owner.is_some() {
            return Err(AgentError::OwnershipMismatch {
                house,
                reason: "initial assignment of an owned house".to_owned(),
            });
        }
        let position = home.position;
        let owner = self.household_mut(household)?;
        if owner.house.is_some() {
            return Err(AgentError::AlreadyOwner(household));
        }
        owner.house = Some(house);
        owner.position = position;

        let home = self.house_mut(house)?;
        home.owner = Some(household);
        home.available = false;
        Ok(())
    }

    /// Put an owned house on the market. The owner stays in it.
    pub fn list_house(&mut self, house: HouseId) -> Result<(), AgentError> {
        let home = self.house_mut(house)?;
        if home.owner.is_none() {
            return Err(AgentError::OwnershipMismatch {
                house,
                reason: "listing a house without an owner".to_owned(),
            });
        }
        home.available = true;
        Ok(())
    }

    /// Atomically hand `house` to `buyer`.
    ///
    /// A previous owner is evicted to the off-market cell, receives the
    /// price net of its mortgage, and remembers the house as its reference
    /// point. The buyer borrows up to `quote` and pays the rest from
    /// savings, then moves onto the house cell.
    pub fn transfer(&mut self, house: HouseId, buyer: HouseholdId, quote: f64) -> Result<Transfer, AgentError> {
        let home = self.house(house)?;
        if !home.available {
            return Err(AgentError::NotForSale(house));
        }
        let price = home.price;
        let position = home.position;
        let seller = home.owner;
        if self.household(buyer)?.house.is_some() {
            return Err(AgentError::AlreadyOwner(buyer));
        }

        let (seller_proceeds, seller_mortgage_settled) = match seller {
            Some(seller_id) => {
                let previous = self.household_mut(seller_id)?;
                if previous.house != Some(house) {
                    return Err(AgentError::OwnershipMismatch {
                        house,
                        reason: format!("recorded owner {seller_id} does not hold the house"),
                    });
                }
                let settled = previous.mortgage;
                let proceeds = price - settled;
                previous.savings += proceeds;
                previous.mortgage = 0.0;
                previous.house = None;
                previous.sold_house = Some(house);
                previous.position = Position::OFF_MARKET;
                (proceeds, settled)
            }
            None => (0.0, 0.0),
        };

        let new_owner = self.household_mut(buyer)?;
        let (buyer_mortgage, buyer_outlay) = if price > quote {
            (quote.max(0.0), price - quote.max(0.0))
        } else {
            (price, 0.0)
        };
        new_owner.mortgage = buyer_mortgage;
        new_owner.savings -= buyer_outlay;
        new_owner.house = Some(house);
        new_owner.position = position;
        new_owner.months_renting = 0;

        let home = self.house_mut(house)?;
        home.owner = Some(buyer);
        home.available = false;

        Ok(Transfer {
            house,
            buyer,
            seller,
            price,
            buyer_mortgage,
            buyer_outlay,
            seller_proceeds,
            seller_mortgage_settled,
        })
    }

    /// Remove a household, putting its house (if any) back on the market
    /// without an owner.
    pub fn remove_household(&mut self, id: HouseholdId) -> Result<Household, AgentError> {
        let gone = self
            .households
            .remove(&id)
            .ok_or(AgentError::HouseholdNotFound(id))?;
        if let Some(house) = gone.house {
            let home = self.house_mut(house)?;
            home.owner = None;
            home.available = true;
        }
        Ok(gone)
    }

    /// Verify that every ownership link is consistent in both directions
    /// and that unavailable houses always have an owner.
    pub fn check_ownership(&self) -> Result<(), AgentError> {
        for house in self.houses.values() {
            match house.owner {
                None if !house.available => {
                    return Err(AgentError::OwnershipMismatch {
                        house: house.id,
                        reason: "off the market without an owner".to_owned(),
                    });
                }
                None => {}
                Some(owner) => {
                    let holder = self.household(owner)?;
                    if holder.house != Some(house.id) {
                        return Err(AgentError::OwnershipMismatch {
                            house: house.id,
                            reason: format!("owner {owner} points elsewhere"),
                        });
                    }
                }
            }
        }
        for household in self.households.values() {
            if let Some(house) = household.house
                && self.house(house)?.owner != Some(household.id)
            {
                return Err(AgentError::OwnershipMismatch {
                    house,
                    reason: format!("household {} is not the recorded owner", household.id),
                });
            }
        }
        Ok(())
    }
}
