use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_fields::{Field, FieldType, InsertOptions, Placement, Signature};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a text or signature field onto a page
    InsertField {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Field description as JSON (instead of the field flags)
        #[arg(long, conflicts_with_all = ["field_type", "page", "x", "y", "width", "height", "text", "signature_image"])]
        field: Option<PathBuf>,

        /// Field type
        #[arg(long = "type", value_enum, required_unless_present = "field")]
        field_type: Option<FieldTypeArg>,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,

        /// Left edge, percent of the visible page width
        #[arg(long, required_unless_present = "field")]
        x: Option<f32>,

        /// Top edge, percent of the visible page height
        #[arg(long, required_unless_present = "field")]
        y: Option<f32>,

        /// Width, percent of the visible page width
        #[arg(long, required_unless_present = "field")]
        width: Option<f32>,

        /// Height, percent of the visible page height
        #[arg(long, required_unless_present = "field")]
        height: Option<f32>,

        /// Text to draw (use \n for line breaks)
        #[arg(long, default_value = "")]
        text: String,

        /// Signature image (PNG or JPEG), signature fields only
        #[arg(long)]
        signature_image: Option<PathBuf>,

        /// Options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// TrueType font for signature fields
        #[arg(long)]
        handwriting_font: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldTypeArg {
    Signature,
    FreeSignature,
    Name,
    Email,
    Date,
    Text,
}

impl From<FieldTypeArg> for FieldType {
    fn from(arg: FieldTypeArg) -> Self {
        match arg {
            FieldTypeArg::Signature => Self::Signature,
            FieldTypeArg::FreeSignature => Self::FreeSignature,
            FieldTypeArg::Name => Self::Name,
            FieldTypeArg::Email => Self::Email,
            FieldTypeArg::Date => Self::Date,
            FieldTypeArg::Text => Self::Text,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::InsertField {
            input,
            output,
            field,
            field_type,
            page,
            x,
            y,
            width,
            height,
            text,
            signature_image,
            config,
            handwriting_font,
        } => {
            let mut options = match &config {
                Some(path) => InsertOptions::load(path)
                    .await
                    .with_context(|| format!("Loading options from {}", path.display()))?,
                None => InsertOptions::default(),
            }
            .with_env();
            if handwriting_font.is_some() {
                options.handwriting_font = handwriting_font;
            }
            log::debug!("Insert options: {:?}", options);

            let field = match field {
                Some(path) => Field::load(&path)
                    .await
                    .with_context(|| format!("Loading field from {}", path.display()))?,
                None => {
                    let signature = match &signature_image {
                        Some(path) => {
                            let bytes = tokio::fs::read(path).await.with_context(|| {
                                format!("Reading signature image {}", path.display())
                            })?;
                            Some(Signature::from_image_bytes(&bytes))
                        }
                        None => None,
                    };

                    // Presence is enforced by clap unless --field is given
                    Field {
                        field_type: field_type.map(Into::into).unwrap_or(FieldType::Text),
                        page,
                        position_x: x.unwrap_or_default(),
                        position_y: y.unwrap_or_default(),
                        width: width.unwrap_or_default(),
                        height: height.unwrap_or_default(),
                        custom_text: text.replace("\\n", "\n"),
                        signature,
                    }
                }
            };

            let doc = pdf_fields::load_pdf(&input)
                .await
                .with_context(|| format!("Loading {}", input.display()))?;
            let (doc, placement) = pdf_fields::insert_field(doc, &field, &options).await?;
            pdf_fields::save_pdf(doc, &output).await?;

            match placement {
                Placement::Text(text) => {
                    println!("Text field on page {}:", field.page);
                    println!("  Position: ({:.2}, {:.2}) pt", text.x, text.y);
                    println!("  Size: {:.2} x {:.2} pt", text.width, text.height);
                    println!("  Font size: {:.2} pt", text.font_size);
                    println!("  Lines: {}", text.line_count);
                }
                Placement::Image(image) => {
                    println!("Signature image on page {}:", field.page);
                    println!("  Position: ({:.2}, {:.2}) pt", image.x, image.y);
                    println!("  Size: {:.2} x {:.2} pt", image.width, image.height);
                    println!("  Scale: {:.3}", image.scale);
                }
            }
            println!("Inserted → {}", output.display());
        }
    }

    Ok(())
}
