use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rust_decimal::Decimal;

use storefront_rs::models::{CartItem, CartItemKey, ImageFile};
use storefront_rs::services::{ApiSessionResolver, JwtSessionResolver, ProductService, SessionResolver};
use storefront_rs::storage::FileStorage;
use storefront_rs::ui::{AdminMessage, CartMessage, CartWidget, ProductsAdminPage, RootLayout};
use storefront_rs::{init_config, init_logging, Config};

#[derive(Parser)]
#[command(name = "storefront", about = "Storefront cart and product administration")]
struct Cli {
    /// Directory holding `config/` (defaults to the executable's directory).
    #[arg(long)]
    home: Option<PathBuf>,
    /// Cookie header to send instead of the configured one.
    #[arg(long)]
    cookie: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Cart(CartCommand),
    #[command(subcommand)]
    Products(ProductsCommand),
}

#[derive(Args)]
struct LineKey {
    product_id: String,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    color: Option<String>,
}

impl LineKey {
    fn key(&self) -> CartItemKey {
        CartItemKey::new(self.product_id.as_str(), self.size.as_deref(), self.color.as_deref())
    }
}

#[derive(Subcommand)]
enum CartCommand {
    Show,
    Add {
        #[command(flatten)]
        line: LineKey,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Inc(LineKey),
    Dec(LineKey),
    Remove(LineKey),
    Clear,
}

#[derive(Subcommand)]
enum ProductsCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        size: String,
        #[arg(long)]
        color: String,
        #[arg(long)]
        stock: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: String,
        #[arg(long, default_value = "")]
        image_url: String,
        /// Skip the confirmation.
        #[arg(long)]
        yes: bool,
    },
}

fn home_dir(cli: &Cli) -> Result<PathBuf, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(ref home) = cli.home {
        return Ok(home.clone());
    }
    let exe = env::current_exe()?;
    Ok(exe.parent().map(|p| p.to_owned()).unwrap_or_else(|| PathBuf::from(".")))
}

fn print_cart(widget: &CartWidget<FileStorage>) {
    if widget.is_empty() {
        println!("{}", CartWidget::<FileStorage>::EMPTY_TEXT);
        return;
    }
    for item in widget.items() {
        let variant = item.variant_label().unwrap_or_default();
        println!(
            "{}  {} x{}  {}  {}",
            item.key(),
            item.name,
            item.quantity,
            item.format_price(),
            variant
        );
    }
    println!("Total: {}", widget.formatted_total());
}

fn run_cart(command: CartCommand, storage: FileStorage) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut widget = CartWidget::load(storage);
    match command {
        CartCommand::Show => {}
        CartCommand::Add {
            line,
            name,
            price,
            image_url,
            quantity,
        } => {
            widget.add_item(CartItem {
                product_id: line.product_id,
                name,
                price: Decimal::from_str(price.trim())?,
                image_url,
                quantity,
                size: line.size,
                color: line.color,
            });
        }
        CartCommand::Inc(line) => {
            widget.update(CartMessage::IncrementQuantity(line.key()));
        }
        CartCommand::Dec(line) => {
            widget.update(CartMessage::DecrementQuantity(line.key()));
        }
        CartCommand::Remove(line) => {
            widget.update(CartMessage::RemoveItem(line.key()));
        }
        CartCommand::Clear => widget.clear(),
    }
    print_cart(&widget);
    Ok(())
}

async fn run_products(
    command: ProductsCommand,
    config: &Config,
    cookie: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = config.server_addr();
    let resolver: Box<dyn SessionResolver> = match config.session_secret() {
        Some(secret) => Box::new(JwtSessionResolver::new(secret.as_str())),
        None => Box::new(ApiSessionResolver::new(addr.as_str())),
    };
    let layout = RootLayout::bootstrap(
        resolver.as_ref(),
        cookie,
        ProductsAdminPage::new(ProductService::new(addr.as_str(), cookie)?),
    )
    .await;
    let status = layout.session_status();
    let mut page = layout.children;
    page.mount(status).await;
    if let Some(ref to) = page.redirect {
        println!("Sign in required: {}", to);
        return Ok(());
    }
    match command {
        ProductsCommand::List => {}
        ProductsCommand::Create {
            name,
            description,
            price,
            category,
            size,
            color,
            stock,
            image,
        } => {
            for msg in vec![
                AdminMessage::NameInput(name),
                AdminMessage::DescriptionInput(description),
                AdminMessage::PriceInput(price),
                AdminMessage::CategoryInput(category),
                AdminMessage::SizeInput(size),
                AdminMessage::ColorInput(color),
                AdminMessage::StockInput(stock),
            ] {
                page.update(msg).await;
            }
            if let Some(path) = image {
                page.update(AdminMessage::ImageSelected(ImageFile::from_path(path).await?))
                    .await;
            }
            page.update(AdminMessage::Submit).await;
        }
        ProductsCommand::Delete { id, image_url, yes } => {
            page.update(AdminMessage::Delete {
                id,
                image_url,
                confirmed: yes,
            })
            .await;
            if !yes {
                println!("Nothing deleted, pass --yes to confirm");
            }
        }
    }
    if !page.error.is_empty() {
        println!("Error: {}", page.error);
    }
    for p in page.products.iter() {
        println!(
            "{}  {}  {} ₽  {}  {}/{}  stock:{}",
            p.id, p.name, p.price, p.category, p.size, p.color, p.stock
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let home = home_dir(&cli)?;
    if let Err(e) = init_logging(home.as_path()) {
        eprintln!("logging not configured: {}", e);
    }
    info!("home: {}", home.display());
    let config = match init_config(home.as_path()).await {
        Ok(config) => config,
        Err(e) => {
            error!("load config error: {}", e);
            return Err(e.into());
        }
    };
    let cookie = cli.cookie.clone().unwrap_or_else(|| config.session_cookie());
    match cli.command {
        Command::Cart(command) => {
            let storage = FileStorage::new(config.storage_dir(home.as_path()))?;
            run_cart(command, storage)
        }
        Command::Products(command) => run_products(command, &config, cookie.as_str()).await,
    }
}
