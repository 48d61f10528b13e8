use concordium_cis1::TokenIdVec;
use concordium_std::*;

pub const ITEM_LISTED_TAG: u8 = u8::MAX - 8;
pub const ITEM_CANCELED_TAG: u8 = u8::MAX - 9;
pub const ITEM_BOUGHT_TAG: u8 = u8::MAX - 10;

/// Token listed event data. Also logged on a price update, which reuses the
/// listing event with the new price.
#[derive(Debug, Serial)]
pub struct ItemListedEvent<'a> {
    /// Token contract address.
    pub contract: &'a ContractAddress,
    /// Token identifier.
    pub id: &'a TokenIdVec,
    /// Address of the token owner.
    pub seller: &'a AccountAddress,
    /// Listed price.
    pub price: Amount,
}

/// Listing canceled event data.
#[derive(Debug, Serial)]
pub struct ItemCanceledEvent<'a> {
    /// Token contract address.
    pub contract: &'a ContractAddress,
    /// Token identifier.
    pub id: &'a TokenIdVec,
    /// Address of the token owner.
    pub seller: &'a AccountAddress,
}

/// Token bought event data.
#[derive(Debug, Serial)]
pub struct ItemBoughtEvent<'a> {
    /// Token contract address.
    pub contract: &'a ContractAddress,
    /// Token identifier.
    pub id: &'a TokenIdVec,
    /// New token owner.
    pub buyer: &'a AccountAddress,
    /// Listed price the sale was fulfilled at.
    pub price: Amount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum MarketplaceEvent<'a> {
    /// Token listed for sale or listing price updated.
    Listed(ItemListedEvent<'a>),
    /// Listing canceled by the seller.
    Canceled(ItemCanceledEvent<'a>),
    /// Token bought.
    Bought(ItemBoughtEvent<'a>),
}

impl<'a> MarketplaceEvent<'a> {
    pub fn listed(
        contract: &'a ContractAddress,
        id: &'a TokenIdVec,
        seller: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::Listed(ItemListedEvent {
            contract,
            id,
            seller,
            price,
        })
    }

    pub fn canceled(
        contract: &'a ContractAddress,
        id: &'a TokenIdVec,
        seller: &'a AccountAddress,
    ) -> Self {
        Self::Canceled(ItemCanceledEvent {
            contract,
            id,
            seller,
        })
    }

    pub fn bought(
        contract: &'a ContractAddress,
        id: &'a TokenIdVec,
        buyer: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::Bought(ItemBoughtEvent {
            contract,
            id,
            buyer,
            price,
        })
    }
}

impl<'a> Serial for MarketplaceEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            MarketplaceEvent::Listed(event) => {
                out.write_u8(ITEM_LISTED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::Canceled(event) => {
                out.write_u8(ITEM_CANCELED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::Bought(event) => {
                out.write_u8(ITEM_BOUGHT_TAG)?;
                event.serial(out)
            }
        }
    }
}
