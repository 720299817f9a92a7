use async_trait::async_trait;
use ethers::{
    abi::{Abi, Token},
    contract::ContractError,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Address, BlockNumber, TransactionRequest, TxHash,
        U256,
    },
    utils::to_checksum,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{
    client::{connect_provider, network_name, resolve_chain_id},
    traits::WalletRegistry,
};
use crate::{
    core::{
        abi::{
            encode_call, registry_abi, selector_from_signature, GlobalP2P, DEPLOY_WALLET,
            DEPLOY_WALLET_SIGNATURE, WALLETS,
        },
        config::{GasLimitPolicy, WalletOptions, DEFAULT_GAS_LIMIT},
        errors::AdapterError,
    },
    security::OperatorKey,
};

/// Canonical string form of the zero address, returned for unregistered users.
pub const NIL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Parameters attached to a write transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactOptions {
    pub from: Address,
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub value: U256,
}

/// Creates and resolves per-user wallets through the GlobalP2P registry.
///
/// Every write signs with the single operator key held by `signer`. Nonces are
/// read from the node's pending state on each call and are not coordinated
/// locally, so concurrent writes sharing one adapter can collide on a nonce.
pub struct WalletAdapter<M, S = LocalWallet> {
    client: Arc<M>,
    registry: GlobalP2P<M>,
    abi: Abi,
    signer: S,
    options: WalletOptions,
}

impl WalletAdapter<Provider<Http>, LocalWallet> {
    /// Parse the operator key, dial `options.rpc_url`, resolve the chain id and bind the registry.
    pub async fn connect(options: WalletOptions) -> Result<Self, AdapterError> {
        options.validate()?;
        let key = OperatorKey::from_secret(&options.signer_private_key)?;
        let provider = connect_provider(&options.rpc_url, options.request_timeout())?;
        Self::with_key(Arc::new(provider), key, options).await
    }
}

impl<M> WalletAdapter<M, LocalWallet>
where
    M: Middleware + 'static,
{
    /// Same as [`WalletAdapter::connect`] but over an existing chain client.
    pub async fn with_client(client: Arc<M>, options: WalletOptions) -> Result<Self, AdapterError> {
        options.validate()?;
        let key = OperatorKey::from_secret(&options.signer_private_key)?;
        Self::with_key(client, key, options).await
    }

    async fn with_key(
        client: Arc<M>,
        key: OperatorKey,
        options: WalletOptions,
    ) -> Result<Self, AdapterError> {
        let chain_id = resolve_chain_id(client.as_ref(), options.chain_id).await?;
        let signer = key.to_wallet(chain_id)?;
        Self::new(client, signer, options)
    }
}

impl<M, S> WalletAdapter<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    /// Assemble an adapter from its parts. The signer's chain id is used for signing.
    pub fn new(client: Arc<M>, signer: S, options: WalletOptions) -> Result<Self, AdapterError> {
        let registry = GlobalP2P::new(options.registry_address, client.clone());
        let abi = registry_abi()?;

        info!(
            operator = ?signer.address(),
            registry = ?options.registry_address,
            network = %network_name(signer.chain_id()),
            gas_limit = ?options.gas_limit,
            "Wallet adapter ready"
        );

        Ok(Self { client, registry, abi, signer, options })
    }

    /// Address derived from the operator key; the `from` of every write.
    pub fn operator_address(&self) -> Address {
        self.signer.address()
    }

    /// GlobalP2P registry contract the adapter is bound to.
    pub fn registry_address(&self) -> Address {
        self.options.registry_address
    }

    /// EIP-155 chain id used when signing.
    pub fn chain_id(&self) -> u64 {
        self.signer.chain_id()
    }

    /// Options the adapter was built with.
    pub fn options(&self) -> &WalletOptions {
        &self.options
    }

    /// Deploys a wallet for `user_id`, then reads the registry to return its address.
    pub async fn create_wallet(&self, user_id: &str) -> Result<String, AdapterError> {
        info!(user_id, "Creating wallet");

        let mut opts = self.transact_options(U256::zero()).await?;
        if self.options.gas_limit == GasLimitPolicy::Estimate {
            opts.gas_limit = self
                .estimate_gas_usage(DEPLOY_WALLET, &[Token::String(user_id.to_owned())])
                .await?;
        }

        let tx_hash = self.deploy_wallet(&opts, user_id).await?;
        let tx_hash = format!("0x{}", hex::encode(tx_hash.as_bytes()));

        match self.wallet_address_for(user_id).await {
            Ok(address) => {
                info!(user_id, %address, tx_hash = %tx_hash, "Wallet created");
                Ok(address)
            }
            Err(e) => {
                warn!(user_id, tx_hash = %tx_hash, "Wallet submitted but lookup failed: {}", e);
                Err(AdapterError::ReadBackFailed {
                    user_id: user_id.to_owned(),
                    tx_hash,
                    source: Box::new(e),
                })
            }
        }
    }

    /// Resolves `user_id` to its registered wallet as checksummed hex.
    pub async fn wallet_address_for(&self, user_id: &str) -> Result<String, AdapterError> {
        let address = self.wallet_of(user_id).await?;
        Ok(to_checksum(&address, None))
    }

    /// Read-only `wallets(user_id)` call against the latest block.
    pub async fn wallet_of(&self, user_id: &str) -> Result<Address, AdapterError> {
        debug!(user_id, "Looking up wallet");
        let address = self
            .registry
            .wallets(user_id.to_owned())
            .call()
            .await
            .map_err(|e| call_error(WALLETS, e))?;

        if address.is_zero() {
            debug!(user_id, "No wallet registered");
        }
        Ok(address)
    }

    /// Signs and submits `deployWallet(user_id)` with the given options.
    ///
    /// Returns as soon as the node accepts the transaction; inclusion is not awaited.
    pub async fn deploy_wallet(
        &self,
        opts: &TransactOptions,
        user_id: &str,
    ) -> Result<TxHash, AdapterError> {
        let call = self
            .registry
            .deploy_wallet(user_id.to_owned())
            .legacy()
            .from(opts.from)
            .nonce(opts.nonce)
            .gas(opts.gas_limit)
            .gas_price(opts.gas_price)
            .value(opts.value);

        let mut tx: TypedTransaction = call.tx;
        tx.set_chain_id(self.signer.chain_id());

        debug!(
            selector = %hex::encode(selector_from_signature(DEPLOY_WALLET_SIGNATURE)),
            nonce = %opts.nonce,
            gas_limit = %opts.gas_limit,
            gas_price = %opts.gas_price,
            "Submitting deployWallet"
        );

        let signature = self
            .signer
            .sign_transaction(&tx)
            .await
            .map_err(|e| AdapterError::SigningFailed(e.to_string()))?;

        let pending = self
            .client
            .send_raw_transaction(tx.rlp_signed(&signature))
            .await
            .map_err(|e| AdapterError::rpc("eth_sendRawTransaction", e))?;

        let tx_hash = pending.tx_hash();
        info!(tx_hash = ?tx_hash, user_id, "deployWallet sent");
        Ok(tx_hash)
    }

    /// Pending nonce and suggested gas price for the operator, plus the policy gas limit.
    ///
    /// Under [`GasLimitPolicy::Estimate`] the limit is a placeholder that
    /// [`WalletAdapter::create_wallet`] replaces with an estimate.
    pub async fn transact_options(&self, value: U256) -> Result<TransactOptions, AdapterError> {
        let from = self.signer.address();

        let nonce = self
            .client
            .get_transaction_count(from, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| AdapterError::rpc("eth_getTransactionCount", e))?;

        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| AdapterError::rpc("eth_gasPrice", e))?;

        let gas_limit = match self.options.gas_limit {
            GasLimitPolicy::Fixed { limit } => limit,
            GasLimitPolicy::Estimate => DEFAULT_GAS_LIMIT,
        };

        debug!(from = ?from, nonce = %nonce, gas_price = %gas_price, gas_limit, "Transaction options");
        Ok(TransactOptions { from, nonce, gas_price, gas_limit: U256::from(gas_limit), value })
    }

    /// ABI-encodes `method(args)` and asks the node how much gas it would use
    /// when sent by the operator to the registry with zero value.
    pub async fn estimate_gas_usage(
        &self,
        method: &str,
        args: &[Token],
    ) -> Result<U256, AdapterError> {
        let data = encode_call(&self.abi, method, args)?;

        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.signer.address())
            .to(self.options.registry_address)
            .value(U256::zero())
            .data(data)
            .into();

        let gas = self
            .client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| AdapterError::rpc("eth_estimateGas", e))?;

        info!(method, gas = %gas, "Max transaction gas");
        Ok(gas)
    }
}

/// Reverts arrive as bare revert data; report the decoded reason or the raw bytes.
fn call_error<M: Middleware>(method: &'static str, err: ContractError<M>) -> AdapterError {
    match err.as_revert() {
        Some(data) => {
            let reason = err.decode_revert::<String>().unwrap_or_else(|| data.to_string());
            AdapterError::contract(method, format!("execution reverted: {}", reason))
        }
        None => AdapterError::contract(method, err),
    }
}

#[async_trait]
impl<M, S> WalletRegistry for WalletAdapter<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    async fn create_wallet(&self, user_id: &str) -> Result<String, AdapterError> {
        WalletAdapter::create_wallet(self, user_id).await
    }

    async fn wallet_address_for(&self, user_id: &str) -> Result<String, AdapterError> {
        WalletAdapter::wallet_address_for(self, user_id).await
    }
}
