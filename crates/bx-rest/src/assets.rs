//! Wallet endpoints (signed, timestamped).
//!
//! | Operation                   | Method | Path                                       |
//! |-----------------------------|--------|--------------------------------------------|
//! | Balances                    | GET    | `assets/balance_list`                      |
//! | Cancel withdrawal           | GET    | `assets/cancel_withdrawal/{id}`            |
//! | Create withdrawal           | POST   | `assets/create_withdrawal`                 |
//! | Create withdrawal address   | POST   | `assets/create_withdrawal_address`         |
//! | Delete withdrawal address   | GET    | `assets/delete_withdrawal_address/{id}`    |
//! | Deposit address             | GET    | `assets/deposit_address/{symbol}`          |
//! | Deposit history             | GET    | `assets/deposit_list`                      |
//! | Deposit history (by symbol) | GET    | `assets/deposit_list/{symbol}`             |
//! | Frozen withdrawals          | GET    | `assets/freeze_list`                       |
//! | Withdrawal addresses        | GET    | `assets/withdrawal_address_list`           |
//! | ... by symbol               | GET    | `assets/withdrawal_address_list/{symbol}`  |
//! | Withdrawal history          | GET    | `assets/withdrawal_list`                   |

use bx_core::error::Result;
use bx_core::types::{
    CreateWithdrawalAddressRequest, CreateWithdrawalRequest, PageQuery, Params, TransferListQuery,
};
use serde_json::Value;

use crate::client::BtcexaClient;
use crate::endpoints::{self, EndpointDef};

impl BtcexaClient {
    async fn stamped(&self, def: &EndpointDef, args: Params, timestamp: Option<u64>) -> Result<Value> {
        self.dispatch(def, args.with_opt("timestamp", timestamp)).await
    }

    pub async fn balance_list(&self, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::BALANCE_LIST, Params::new(), timestamp).await
    }

    pub async fn cancel_withdrawal(&self, id: &str, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::CANCEL_WITHDRAWAL, Params::new().with("id", id), timestamp).await
    }

    pub async fn create_withdrawal(&self, request: &CreateWithdrawalRequest, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::CREATE_WITHDRAWAL, Params::from_serialize(request)?, timestamp).await
    }

    pub async fn create_withdrawal_address(
        &self,
        request: &CreateWithdrawalAddressRequest,
        timestamp: Option<u64>,
    ) -> Result<Value> {
        self.stamped(&endpoints::CREATE_WITHDRAWAL_ADDRESS, Params::from_serialize(request)?, timestamp)
            .await
    }

    pub async fn delete_withdrawal_address(&self, id: &str, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::DELETE_WITHDRAWAL_ADDRESS, Params::new().with("id", id), timestamp).await
    }

    pub async fn deposit_address(&self, symbol: &str, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::DEPOSIT_ADDRESS, Params::new().with("symbol", symbol), timestamp).await
    }

    pub async fn deposit_list(&self, query: &TransferListQuery, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::DEPOSIT_LIST, Params::from_serialize(query)?, timestamp).await
    }

    pub async fn deposit_list_by_symbol(
        &self,
        symbol: &str,
        page: &PageQuery,
        timestamp: Option<u64>,
    ) -> Result<Value> {
        let args = Params::from_serialize(page)?.with("symbol", symbol);
        self.stamped(&endpoints::DEPOSIT_LIST_BY_SYMBOL, args, timestamp).await
    }

    /// Withdrawals frozen pending review.
    pub async fn freeze_list(&self, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::FREEZE_LIST, Params::new(), timestamp).await
    }

    pub async fn withdrawal_address_list(&self, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::WITHDRAWAL_ADDRESS_LIST, Params::new(), timestamp).await
    }

    pub async fn withdrawal_address_list_by_symbol(&self, symbol: &str, timestamp: Option<u64>) -> Result<Value> {
        let args = Params::new().with("symbol", symbol);
        self.stamped(&endpoints::WITHDRAWAL_ADDRESS_LIST_BY_SYMBOL, args, timestamp).await
    }

    pub async fn withdrawal_list(&self, query: &TransferListQuery, timestamp: Option<u64>) -> Result<Value> {
        self.stamped(&endpoints::WITHDRAWAL_LIST, Params::from_serialize(query)?, timestamp).await
    }
}
