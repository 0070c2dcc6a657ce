//! CLI tool for deploying and interacting with the lending module contracts.

use lending_contracts::lending::credit_oracle::CreditOracle;
use lending_contracts::lending::lending_module::LendingModule;
use odra::prelude::Addressable;
use odra::host::{HostEnv, HostRef};
use odra::casper_types::U512;
use odra::schema::casper_contract_schema::NamedCLType;
use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt,
    OdraCli,
};

/// Deploys the reference credit oracle with the deployer as operator.
pub struct CreditOracleDeployScript;

impl DeployScript for CreditOracleDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        use lending_contracts::lending::credit_oracle::CreditOracleInitArgs;

        let operator = env.caller();
        let _oracle = CreditOracle::load_or_deploy(
            &env,
            CreditOracleInitArgs { operator },
            container,
            300_000_000_000, // Gas limit for oracle deployment
        )?;

        Ok(())
    }
}

/// Deploys the lending module wired to the deployed oracle.
/// Requires the credit oracle to be deployed first.
pub struct LendingModuleDeployScript;

impl DeployScript for LendingModuleDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        use lending_contracts::lending::lending_module::LendingModuleInitArgs;

        // Get oracle address from container
        let oracle = container.contract_ref::<CreditOracle>(env)?;
        let oracle_address = oracle.address().clone();

        let _lending = LendingModule::load_or_deploy(
            &env,
            LendingModuleInitArgs {
                annual_rate_bps: 500, // 5% annual interest rate
                oracle: oracle_address,
                job_id: String::from("LM_Test_JobID_01"),
                fee: U512::from(100_000_000u64), // 0.1 CSPR per request
                request_ttl: 0,
            },
            container,
            500_000_000_000, // Gas limit for lending module deployment
        )?;

        Ok(())
    }
}

/// Deploys the complete stack (oracle + lending module).
pub struct LendingStackDeployScript;

impl DeployScript for LendingStackDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        // Deploy the oracle first
        CreditOracleDeployScript.deploy(env, container)?;

        // Then the lending module pointing at it
        LendingModuleDeployScript.deploy(env, container)?;

        Ok(())
    }
}

/// Scenario that deposits into the lending module and prints the account
/// details: balance, pending interest and credit score.
pub struct ModuleDetailsScenario;

impl Scenario for ModuleDetailsScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new(
            "deposit",
            "Amount to deposit, in motes",
            NamedCLType::U512,
        )]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args,
    ) -> Result<(), Error> {
        let mut lending = container.contract_ref::<LendingModule>(env)?;
        let caller = env.caller();
        let deposit = args.get_single::<U512>("deposit")?;

        println!(
            "Annual interest rate : {} bps",
            lending.annual_interest_rate_bps()
        );

        env.set_gas(10_000_000_000);
        lending.with_tokens(deposit).try_deposit()?;
        println!("Deposited {} motes", deposit);

        println!("Balance : {} motes", lending.get_balance(caller));
        println!("Pending interest : {} motes", lending.calculate_interest(caller));

        env.set_gas(10_000_000_000);
        lending.try_accrue_interest()?;
        println!("Balance after accrual : {} motes", lending.get_balance(caller));

        env.set_gas(10_000_000_000);
        let fee = lending.oracle_fee();
        let request_id = lending.with_tokens(fee).try_request_credit_score()?;
        println!("Credit score requested, id {}", request_id);

        match lending.get_user_credit_score(caller) {
            Some(score) => println!("User credit score : {}", score),
            None => println!("User credit score : not yet available"),
        }

        Ok(())
    }
}

impl ScenarioMetadata for ModuleDetailsScenario {
    const NAME: &'static str = "module-details";
    const DESCRIPTION: &'static str =
        "Deposits into the lending module and prints balance, interest and credit score";
}

/// Main function to run the CLI tool.
pub fn main() {
    OdraCli::new()
        .about("CLI tool for the lending module smart contracts")
        // Deploy scripts
        .deploy(CreditOracleDeployScript)
        .deploy(LendingModuleDeployScript)
        .deploy(LendingStackDeployScript)
        // Contract references
        .contract::<LendingModule>()
        .contract::<CreditOracle>()
        // Scenarios
        .scenario(ModuleDetailsScenario)
        .build()
        .run();
}
