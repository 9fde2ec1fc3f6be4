use commons::{ContractTokenId, ITEM_BOUGHT_TAG, ITEM_CANCELED_TAG, ITEM_LISTED_TAG};
use concordium_std::*;

/// Item listed event data. Logged on listing creation and again on every price
/// update: a price update re-announces the listing instead of logging a
/// separate event kind.
#[derive(Debug, Serial)]
pub struct ItemListedEvent<'a> {
    /// NFT collection contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Account selling the token.
    pub seller: &'a AccountAddress,
    /// Asking price.
    pub price: Amount,
}

/// Item canceled event data.
#[derive(Debug, Serial)]
pub struct ItemCanceledEvent<'a> {
    /// NFT collection contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Account that had listed the token.
    pub seller: &'a AccountAddress,
}

/// Item bought event data.
#[derive(Debug, Serial)]
pub struct ItemBoughtEvent<'a> {
    /// NFT collection contract address.
    pub contract: &'a ContractAddress,
    /// NFT token identifier.
    pub id: &'a ContractTokenId,
    /// Account that bought the token.
    pub buyer: &'a AccountAddress,
    /// Price the sale settled at.
    pub price: Amount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum MarketplaceEvent<'a> {
    ItemListed(ItemListedEvent<'a>),
    ItemCanceled(ItemCanceledEvent<'a>),
    ItemBought(ItemBoughtEvent<'a>),
}

impl<'a> MarketplaceEvent<'a> {
    pub fn listed(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        seller: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::ItemListed(ItemListedEvent {
            contract,
            id,
            seller,
            price,
        })
    }

    pub fn canceled(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        seller: &'a AccountAddress,
    ) -> Self {
        Self::ItemCanceled(ItemCanceledEvent {
            contract,
            id,
            seller,
        })
    }

    pub fn bought(
        contract: &'a ContractAddress,
        id: &'a ContractTokenId,
        buyer: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::ItemBought(ItemBoughtEvent {
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
            MarketplaceEvent::ItemListed(event) => {
                out.write_u8(ITEM_LISTED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::ItemCanceled(event) => {
                out.write_u8(ITEM_CANCELED_TAG)?;
                event.serial(out)
            }
            MarketplaceEvent::ItemBought(event) => {
                out.write_u8(ITEM_BOUGHT_TAG)?;
                event.serial(out)
            }
        }
    }
}
