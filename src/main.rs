use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cnet_integracoes::lookup::regions;
use cnet_integracoes::repository::{BillingRecords, MySqlBillingStore, TableColumns};
use cnet_integracoes::services::{card_brand, CentralBillingClient, CieloClient, ConsultaOptions};
use cnet_integracoes::utils::{installments, money};
use cnet_integracoes::{Config, HttpResult};
use rust_decimal::Decimal;
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cnet", version, about = "Integrações do Conselho: cobranças, regionais e Cielo")]
struct Cli {
    #[arg(long, global = true, help = "Arquivo TOML de configuração (padrão: variáveis de ambiente)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Divide um valor em parcelas
    Parcelas {
        total: Decimal,
        #[arg(default_value_t = 1)]
        quantidade: usize,
    },
    /// Identifica a bandeira de um cartão
    Bandeira { numero: String },
    /// Converte entre id do regional e UF
    Regional { valor: String },
    /// Consulta as cobranças de um CPF/CNPJ
    Cobrancas {
        regional: u32,
        cpf_cnpj: String,
        #[arg(long, default_value_t = false)]
        corrigido: bool,
        #[arg(long, default_value_t = false)]
        resolucao: bool,
    },
    /// Consulta uma venda na Cielo
    Venda {
        #[arg(long)]
        payment_id: Option<String>,
        #[arg(long)]
        tid: Option<String>,
        #[arg(long)]
        pedido: Option<String>,
    },
    /// Exclusão lógica de um débito
    ExcluirDebito {
        id: i64,
        #[arg(long)]
        usuario: Option<i64>,
        #[arg(long)]
        observacao: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };

    match cli.command {
        Commands::Parcelas { total, quantidade } => {
            let cents = money::to_cents(total).context("valor fora do intervalo suportado")?;
            let parcelas = installments::split(cents, quantidade)?;
            let formatted: Vec<String> = parcelas.iter().map(|c| money::format_brl(*c)).collect();
            print_json(&json!({"total": money::format_brl(cents), "parcelas": formatted}))?;
        }
        Commands::Bandeira { numero } => match card_brand::classify(&numero) {
            Some(brand) => print_json(&json!({"bandeira": brand.name(), "aceita": brand.is_accepted()}))?,
            None => bail!("bandeira não identificada"),
        },
        Commands::Regional { valor } => {
            let id = match valor.parse::<u32>() {
                Ok(id) => id,
                Err(_) => regions::state_code_to_id(&valor)
                    .with_context(|| format!("UF desconhecida: {}", valor))?,
            };
            let entry = regions::find(id).with_context(|| format!("regional desconhecido: {}", id))?;
            print_json(&json!({"id": entry.id, "uf": entry.state_code, "nome": entry.full_name}))?;
        }
        Commands::Cobrancas {
            regional,
            cpf_cnpj,
            corrigido,
            resolucao,
        } => {
            let client = CentralBillingClient::new(&config)?;
            let options = ConsultaOptions { corrigido, resolucao };
            let result = client.consultar_cobrancas(regional, &cpf_cnpj, options).await;
            print_result(&result)?;
        }
        Commands::Venda {
            payment_id,
            tid,
            pedido,
        } => {
            let client = CieloClient::from_config(&config)?;
            let result = match (payment_id, tid, pedido) {
                (Some(id), _, _) => client.consultar_por_payment_id(&id).await,
                (None, Some(tid), _) => client.consultar_por_tid(&tid).await,
                (None, None, Some(pedido)) => client.consultar_por_merchant_order_id(&pedido).await,
                (None, None, None) => bail!("informe --payment-id, --tid ou --pedido"),
            };
            print_result(&result)?;
        }
        Commands::ExcluirDebito {
            id,
            usuario,
            observacao,
        } => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL não configurada")?;
            let store = MySqlBillingStore::connect(url).await?;
            let records = BillingRecords::new(store, TableColumns::default());
            let deleted = records.soft_delete(id, usuario, observacao.as_deref()).await?;
            info!("Soft delete of {}: {}", id, deleted);
            print_json(&json!({"id": id, "excluido": deleted}))?;
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result(result: &HttpResult) -> anyhow::Result<()> {
    if let Some(message) = &result.error {
        error!("Request to {} failed: {}", result.url, message);
    }
    let body = result.json_value().unwrap_or_else(|| json!(result.body));
    print_json(&json!({
        "url": result.url,
        "status": result.status_code,
        "erro": result.error,
        "corpo": body,
    }))
}
