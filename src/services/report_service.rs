// src/services/report_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use sqlx::{Acquire, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::CompanyConfig,
    db::{BudgetRepository, CustomerRepository, ProductRepository, SaleRepository},
};

struct ItemPrintData {
    name: String,
    quantity: i32,
    price: Decimal,
    total: Decimal,
}

#[derive(Clone)]
pub struct ReportService {
    sale_repo: SaleRepository,
    budget_repo: BudgetRepository,
    customer_repo: CustomerRepository,
    product_repo: ProductRepository,
    company: CompanyConfig,
}

impl ReportService {
    pub fn new(
        sale_repo: SaleRepository,
        budget_repo: BudgetRepository,
        customer_repo: CustomerRepository,
        product_repo: ProductRepository,
        company: CompanyConfig,
    ) -> Self {
        Self {
            sale_repo,
            budget_repo,
            customer_repo,
            product_repo,
            company,
        }
    }

    pub async fn generate_sale_pdf<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<u8>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let sale = self
            .sale_repo
            .find_by_id(&mut *tx, sale_id)
            .await?
            .ok_or(AppError::SaleNotFound(sale_id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, sale.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(sale.customer_id))?;
        let items = self.sale_repo.list_items(&mut *tx, sale_id).await?;

        let mut print_items = Vec::with_capacity(items.len());
        for item in &items {
            let name = self.product_name(&mut tx, item.product_id).await?;
            print_items.push(ItemPrintData {
                name,
                quantity: item.quantity,
                price: item.unit_price,
                total: Decimal::from(item.quantity) * item.unit_price,
            });
        }

        tx.commit().await?;

        self.render(
            &format!("VENDA #{}", short_id(sale_id)),
            &format!("Data: {}", sale.sale_date.format("%d/%m/%Y")),
            &customer.name,
            print_items,
            sale.total_amount,
        )
    }

    pub async fn generate_budget_pdf<'e, E>(
        &self,
        executor: E,
        budget_id: Uuid,
    ) -> Result<Vec<u8>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let budget = self
            .budget_repo
            .find_by_id(&mut *tx, budget_id)
            .await?
            .ok_or(AppError::BudgetNotFound(budget_id))?;
        let customer = self
            .customer_repo
            .find_by_id(&mut *tx, budget.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(budget.customer_id))?;
        let items = self.budget_repo.list_items(&mut *tx, budget_id).await?;

        let mut print_items = Vec::with_capacity(items.len());
        for item in &items {
            let name = self.product_name(&mut tx, item.product_id).await?;
            print_items.push(ItemPrintData {
                name,
                quantity: item.quantity,
                price: item.unit_price,
                total: Decimal::from(item.quantity) * item.unit_price,
            });
        }

        tx.commit().await?;

        self.render(
            &format!("ORÇAMENTO #{}", short_id(budget_id)),
            &format!(
                "Data: {} — Válido até: {}",
                budget.budget_date.format("%d/%m/%Y"),
                budget.valid_until.format("%d/%m/%Y")
            ),
            &customer.name,
            print_items,
            budget.total_amount,
        )
    }

    async fn product_name(&self, conn: &mut PgConnection, id: Uuid) -> Result<String, AppError> {
        // Produto removido do catálogo ainda imprime: o item guarda só o id.
        Ok(self
            .product_repo
            .find_by_id(&mut *conn, id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| "(produto removido)".to_string()))
    }

    fn render(
        &self,
        title: &str,
        date_line: &str,
        customer_name: &str,
        items: Vec<ItemPrintData>,
        total: Decimal,
    ) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(self.company.name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        if let Some(doc_num) = &self.company.document {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(14)),
        );
        doc.push(elements::Paragraph::new(date_line));
        doc.push(elements::Paragraph::new(format!("Cliente: {}", customer_name)));

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Nome (4), Qtd (1), Preço (2), Total (2)
        let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Produto").styled(style_bold))
            .element(elements::Paragraph::new("Qtd").styled(style_bold))
            .element(elements::Paragraph::new("Unitário").styled(style_bold))
            .element(elements::Paragraph::new("Total").styled(style_bold))
            .push()
            .expect("Table error");

        for item in items {
            table
                .row()
                .element(elements::Paragraph::new(item.name))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.price)))
                .element(elements::Paragraph::new(format!("R$ {:.2}", item.total)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL GERAL: R$ {:.2}", total));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        if let Some(key) = &self.company.pix_key {
            doc.push(
                elements::Paragraph::new("PAGAMENTO VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            // QR Code simples da chave. "Pix Copia e Cola" oficial (EMV)
            // exigiria uma lib de payload Pix.
            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        if let Some(addr) = &self.company.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_uppercase()
}
