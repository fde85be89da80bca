// src/services/catalog_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{CategoryRepository, ProductRepository},
    models::{
        catalog::{Category, NewProduct, Product},
        MAX_STOCK,
    },
    services::events::{ChangeFeed, StoreEvent},
};

/// Produtos e categorias.
#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    product_repo: ProductRepository,
    category_repo: CategoryRepository,
    change_feed: ChangeFeed,
}

impl CatalogService {
    pub fn new(
        pool: SqlitePool,
        product_repo: ProductRepository,
        category_repo: CategoryRepository,
        change_feed: ChangeFeed,
    ) -> Self {
        Self { pool, product_repo, category_repo, change_feed }
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.list_all().await
    }

    pub async fn count_products(&self) -> Result<i64, AppError> {
        self.product_repo.count_all().await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(id.to_string()))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Product, AppError> {
        let code = NewProduct::normalize_code(code);
        if code.is_empty() {
            return Err(AppError::MissingField("code"));
        }
        self.product_repo
            .find_by_code(&self.pool, &code)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(code.clone()))
    }

    /// Busca sem diferenciar maiúsculas em nome, código e descrição.
    /// Consulta vazia devolve o catálogo inteiro.
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, AppError> {
        let products = self.product_repo.list_all().await?;
        Ok(filter_products(products, query))
    }

    /// Cria o produto ou, se o código já existir, atualiza nome/preço/estoque/descrição/categoria.
    pub async fn upsert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let product = validate_new_product(product)?;

        let mut tx = self.pool.begin().await?;

        let inserted = self.product_repo.insert_ignore(&mut *tx, &product).await?;
        if inserted.is_none() {
            self.product_repo.update_by_code(&mut *tx, &product).await?;
        }
        let saved = self
            .product_repo
            .find_by_code(&mut *tx, &product.code)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(product.code.clone()))?;

        tx.commit().await?;

        tracing::info!(code = %saved.code, created = inserted.is_some(), "produto salvo");
        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(saved)
    }

    pub async fn update_product(&self, product: Product) -> Result<Product, AppError> {
        let fields = validate_new_product(NewProduct {
            name: product.name,
            code: product.code,
            price: product.price,
            stock: product.stock,
            description: product.description,
            category_id: product.category_id,
        })?;
        let product = Product {
            id: product.id,
            name: fields.name,
            code: fields.code,
            price: fields.price,
            stock: fields.stock,
            description: fields.description,
            category_id: fields.category_id,
        };

        let updated = self.product_repo.update(&self.pool, &product).await?;
        if updated == 0 {
            return Err(AppError::ProductNotFound(product.id.to_string()));
        }

        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let deleted = self.product_repo.delete(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::ProductNotFound(id.to_string()));
        }

        tracing::info!(product_id = id, "produto removido");
        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(())
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.category_repo.list_all().await
    }

    /// Insere se não existir; em qualquer caso devolve a categoria com seu id real.
    pub async fn upsert_category(&self, name: &str) -> Result<Category, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingField("name"));
        }

        let mut tx = self.pool.begin().await?;
        let inserted = self.category_repo.insert_ignore(&mut *tx, name).await?;
        let category = match inserted {
            Some(id) => Category { id, name: name.to_string() },
            None => self
                .category_repo
                .find_by_name(&mut *tx, name)
                .await?
                .ok_or(AppError::CategoryNotFound)?,
        };
        tx.commit().await?;

        if inserted.is_some() {
            self.change_feed.publish(StoreEvent::CategoriesChanged);
        }
        Ok(category)
    }

    pub async fn rename_category(&self, id: i64, new_name: &str) -> Result<Category, AppError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::MissingField("name"));
        }

        let updated = self.category_repo.rename(&self.pool, id, new_name).await?;
        if updated == 0 {
            return Err(AppError::CategoryNotFound);
        }

        self.change_feed.publish(StoreEvent::CategoriesChanged);
        Ok(Category { id, name: new_name.to_string() })
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let deleted = self.category_repo.delete_by_id(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::CategoryNotFound);
        }

        // category_id dos produtos vira NULL, então a lista de produtos também mudou
        self.change_feed.publish(StoreEvent::CategoriesChanged);
        self.change_feed.publish(StoreEvent::ProductsChanged);
        Ok(())
    }
}

fn validate_new_product(p: NewProduct) -> Result<NewProduct, AppError> {
    let name = p.name.trim().to_string();
    let code = NewProduct::normalize_code(&p.code);

    if name.is_empty() {
        return Err(AppError::MissingField("name"));
    }
    if code.is_empty() {
        return Err(AppError::MissingField("code"));
    }
    if !p.price.is_valid_input() {
        return Err(AppError::InvalidAmount);
    }
    if !(0..=MAX_STOCK).contains(&p.stock) {
        return Err(AppError::InvalidQuantity);
    }

    Ok(NewProduct {
        name,
        code,
        description: p.description.trim().to_string(),
        ..p
    })
}

fn filter_products(products: Vec<Product>, query: &str) -> Vec<Product> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return products;
    }
    products
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&q)
                || p.code.to_lowercase().contains(&q)
                || p.description.to_lowercase().contains(&q)
        })
        .collect()
}
