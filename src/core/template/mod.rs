//! Built-in file templates and the `{{key}}` renderer used to materialize them.

pub mod dockerfile;

pub use dockerfile::{extract_custom_block, inject_custom_block, CUSTOM_BLOCK_END, CUSTOM_BLOCK_START};

use crate::core::model::ProjectKind;
use indexmap::IndexMap;

/// Substitutes `{{key}}` placeholders with template variables.
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn render(source: &str, variables: &IndexMap<String, String>) -> String {
        let mut contents = source.to_string();
        for (key, value) in variables {
            contents = contents.replace(&format!("{{{{{}}}}}", key), value);
        }
        contents
    }

    pub fn render_pairs(source: &str, pairs: &[(&str, &str)]) -> String {
        let variables = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self::render(source, &variables)
    }
}

pub const PHP_DOCKERFILE: &str = r#"FROM socle-php-{{PHP_VERSION}}-{{DOCKER_ENV}}

ARG PHP_EXTENSIONS="{{PHP_EXTENSIONS}}"
RUN if [ -n "$PHP_EXTENSIONS" ]; then install-php-extensions $PHP_EXTENSIONS; fi

WORKDIR /var/www/html

## Custom code Here: instructions between these markers survive regeneration ##
## End Custom code ##

CMD ["sh", "-c", "if [ \"$ENABLE_LOCAL_SERVER\" = \"true\" ]; then php -S 0.0.0.0:$PORT_NUMBER -t ./$INDEX_FOLDER; else php-fpm; fi"]
"#;

pub const NODE_DOCKERFILE: &str = r#"FROM socle-node-{{NODE_VERSION}}-{{DOCKER_ENV}}

WORKDIR /usr/src/app

## Custom code Here: instructions between these markers survive regeneration ##
## End Custom code ##

EXPOSE {{PORT_NUMBER}}
CMD ["npm", "run", "{{NPM_SCRIPT}}"]
"#;

pub const PHP_SOCLE_DOCKERFILE: &str = r#"ARG PHP_VERSION
FROM php:${PHP_VERSION}-fpm

ARG DOCKER_ENV
ENV DOCKER_ENV=${DOCKER_ENV}

RUN apt-get update \
    && apt-get install -y --no-install-recommends git unzip curl \
    && rm -rf /var/lib/apt/lists/*
RUN curl -sSLf -o /usr/local/bin/install-php-extensions \
        https://github.com/mlocati/docker-php-extension-installer/releases/latest/download/install-php-extensions \
    && chmod +x /usr/local/bin/install-php-extensions
COPY --from=composer:2 /usr/bin/composer /usr/bin/composer

WORKDIR /var/www/html
"#;

pub const NODE_SOCLE_DOCKERFILE: &str = r#"ARG NODE_VERSION
FROM node:${NODE_VERSION}-alpine

ARG DOCKER_ENV
ENV DOCKER_ENV=${DOCKER_ENV}

RUN apk add --no-cache git

WORKDIR /usr/src/app
"#;

pub const BASE_COMPOSE: &str = r#"version: "3.7"
services:
  php-dev:
    restart: unless-stopped
    tty: true
  php-prod:
    restart: always
  node-dev:
    restart: unless-stopped
    tty: true
  node-prod:
    restart: always
"#;

pub const NGINX_PHP_SITE: &str = r#"server {
    listen {{PORT}};
    server_name {{SERVER_NAME}};
    root /var/www/html/{{FOLDER}}/{{INDEX_FOLDER}};
    index index.php index.html;

    location / {
        try_files $uri /index.php$is_args$args;
    }

    location ~ \.php$ {
        fastcgi_pass {{UPSTREAM}}:9000;
        fastcgi_split_path_info ^(.+\.php)(/.*)$;
        include fastcgi_params;
        fastcgi_param SCRIPT_FILENAME /var/www/html/{{INDEX_FOLDER}}$fastcgi_script_name;
        fastcgi_param DOCUMENT_ROOT /var/www/html/{{INDEX_FOLDER}};
    }

    access_log /var/log/nginx/{{FOLDER}}_access.log;
    error_log /var/log/nginx/{{FOLDER}}_error.log;
}
"#;

pub const NGINX_PROXY_SITE: &str = r#"server {
    listen {{PORT}};
    server_name {{SERVER_NAME}};

    location / {
        proxy_pass http://{{UPSTREAM}}:{{APP_PORT}};
        proxy_set_header Host $host;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_http_version 1.1;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection "upgrade";
    }
}
"#;

pub const PHPSTAN_CONFIG: &str = r#"parameters:
    level: 6
    paths:
        - src
"#;

pub const PHP_CS_FIXER_CONFIG: &str = r#"<?php

$finder = (new PhpCsFixer\Finder())
    ->in(__DIR__)
    ->exclude(['var', 'vendor', 'node_modules']);

return (new PhpCsFixer\Config())
    ->setRules(['@PSR12' => true])
    ->setFinder($finder);
"#;

/// Entries every project-level `.gitignore` starts with.
pub const GITIGNORE_BASE: &[&str] = &["/logs/", "/docker/*/.env", "*.log"];

pub fn project_dockerfile(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Php => PHP_DOCKERFILE,
        ProjectKind::Node => NODE_DOCKERFILE,
    }
}

pub fn socle_dockerfile(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Php => PHP_SOCLE_DOCKERFILE,
        ProjectKind::Node => NODE_SOCLE_DOCKERFILE,
    }
}

/// `.gitignore` entries contributed by one container folder.
pub fn gitignore_entries(kind: ProjectKind, folder: &str) -> Vec<String> {
    let mut entries = vec![format!("/{}/{}", folder, crate::core::env::APPLICATION_ENV_FILE)];
    match kind {
        ProjectKind::Php => entries.push(format!("/{}/vendor/", folder)),
        ProjectKind::Node => entries.push(format!("/{}/node_modules/", folder)),
    }
    entries
}
